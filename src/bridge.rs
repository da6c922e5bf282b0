// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A bridge to forward logs from the `log` crate to logsink.
//!
//! Each record goes to the registered logger named after its target, or to
//! [`DEFAULT_LOGGER`](crate::DEFAULT_LOGGER) if there is none.

use std::sync::Arc;

use crate::logger::Logger;
use crate::logger::payload_of;
use crate::record::Level;
use crate::record::Record;
use crate::registry::registry;

struct LogCrateLogger(());

fn level_of(level: log::Level) -> Level {
    match level {
        log::Level::Error => Level::Error,
        log::Level::Warn => Level::Warn,
        log::Level::Info => Level::Info,
        log::Level::Debug => Level::Debug,
        log::Level::Trace => Level::Trace,
    }
}

fn route(target: &str) -> Option<Arc<Logger>> {
    let registry = registry();
    registry
        .get_logger(target)
        .or_else(|| registry.default_logger())
}

impl log::Log for LogCrateLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        route(metadata.target()).is_some_and(|logger| logger.enabled(level_of(metadata.level())))
    }

    fn log(&self, record: &log::Record) {
        let level = level_of(record.level());
        let Some(logger) = route(record.target()) else {
            return;
        };
        if !logger.enabled(level) {
            return;
        }

        let mut builder = Record::builder()
            .level(level)
            .payload(payload_of(*record.args()));
        if let (Some(file), Some(line)) = (record.file(), record.line()) {
            builder = builder.location(
                file.to_owned(),
                line,
                record.module_path().unwrap_or_default().to_owned(),
            );
        }
        logger.push_record(&builder.build());
    }

    fn flush(&self) {
        for name in registry().names() {
            if let Some(logger) = registry().get_logger(&name) {
                logger.flush();
            }
        }
    }
}

/// Set up the log crate global logger.
///
/// This function calls [`log::set_logger`] to install a proxy and
/// all logs from log crate will be forwarded to the registry.
///
/// This should be called early in the execution of a Rust program. Any log events that occur
/// before initialization will be ignored.
///
/// This function will set the global maximum log level to `Trace`. To override this, call
/// [`log::set_max_level`] after this function.
///
/// # Errors
///
/// Return an error if the log crate global logger has already been set.
///
/// # Examples
///
/// ```
/// if let Err(err) = logsink::bridge::try_setup_log_crate() {
///     eprintln!("failed to setup log crate: {err}");
/// }
/// ```
pub fn try_setup_log_crate() -> Result<(), log::SetLoggerError> {
    static LOGGER: LogCrateLogger = LogCrateLogger(());
    log::set_logger(&LOGGER)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

/// Set up the log crate global logger, ignoring the error if one is already installed.
///
/// Use [`try_setup_log_crate`] to find out whether the installation took place.
pub fn setup_log_crate() {
    if let Err(err) = try_setup_log_crate() {
        eprintln!("logsink: failed to set up the log crate bridge: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::CustomLayout;
    use crate::sink::SinkOptions;
    use crate::sink::testkit::Memory;

    #[test]
    fn test_log_crate_records_are_routed_by_target() {
        let _ = try_setup_log_crate();
        let logger = registry().create_logger("bridge::target").unwrap();
        let layout = CustomLayout::new(|record: &Record, _: bool| {
            Ok(format!("{} {}", record.level(), record.payload()))
        });
        let sink = logger.create_sink(Memory::with_options(
            SinkOptions::default().with_layout(layout),
        ));

        log::info!(target: "bridge::target", "forwarded {}", 1);
        log::debug!(target: "bridge::target", "forwarded {}", 2);

        assert_eq!(sink.lines(), vec!["INFO forwarded 1", "DEBUG forwarded 2"]);
        registry().erase_logger("bridge::target");
    }
}
