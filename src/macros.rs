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

//! Logging macros bound to loggers of the global registry.
//!
//! Every macro takes an optional `logger: <name>,` prefix and otherwise logs to
//! [`DEFAULT_LOGGER`](crate::DEFAULT_LOGGER). Macros bound to a name that is not registered do
//! nothing, and arguments are only formatted once the logger accepted the level.

/// Log a message at the given level.
///
/// # Examples
///
/// ```
/// use logsink::Level;
/// use logsink::log;
///
/// log!(Level::Info, "listening on {}", 8080);
/// log!(logger: "net", Level::Warn, "peer {} timed out", "10.0.0.7");
/// ```
#[macro_export]
macro_rules! log {
    (logger: $name:expr, $lvl:expr, $($arg:tt)+) => {
        $crate::__private::log(
            $name,
            $lvl,
            (::std::file!(), ::std::line!(), ::std::module_path!()),
            ::std::format_args!($($arg)+),
        )
    };
    ($lvl:expr, $($arg:tt)+) => {
        $crate::log!(logger: $crate::DEFAULT_LOGGER, $lvl, $($arg)+)
    };
}

/// Log a message at [`Level::Trace`](crate::Level::Trace).
#[macro_export]
macro_rules! trace {
    (logger: $name:expr, $($arg:tt)+) => {
        $crate::log!(logger: $name, $crate::Level::Trace, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Level::Trace, $($arg)+)
    };
}

/// Log a message at [`Level::Debug`](crate::Level::Debug).
#[macro_export]
macro_rules! debug {
    (logger: $name:expr, $($arg:tt)+) => {
        $crate::log!(logger: $name, $crate::Level::Debug, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Level::Debug, $($arg)+)
    };
}

/// Log a message at [`Level::Info`](crate::Level::Info).
#[macro_export]
macro_rules! info {
    (logger: $name:expr, $($arg:tt)+) => {
        $crate::log!(logger: $name, $crate::Level::Info, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Level::Info, $($arg)+)
    };
}

/// Log a message at [`Level::Warn`](crate::Level::Warn).
#[macro_export]
macro_rules! warn {
    (logger: $name:expr, $($arg:tt)+) => {
        $crate::log!(logger: $name, $crate::Level::Warn, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Level::Warn, $($arg)+)
    };
}

/// Log a message at [`Level::Error`](crate::Level::Error).
#[macro_export]
macro_rules! error {
    (logger: $name:expr, $($arg:tt)+) => {
        $crate::log!(logger: $name, $crate::Level::Error, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Level::Error, $($arg)+)
    };
}

/// Log a message at [`Level::Fatal`](crate::Level::Fatal).
#[macro_export]
macro_rules! fatal {
    (logger: $name:expr, $($arg:tt)+) => {
        $crate::log!(logger: $name, $crate::Level::Fatal, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Level::Fatal, $($arg)+)
    };
}

/// Open a [`LogStream`](crate::LogStream) carrying the call-site location.
///
/// # Examples
///
/// ```
/// use logsink::Level;
/// use logsink::stream;
///
/// let mut out = stream!(logger: "startup", Level::Info);
/// out.append("config loaded from ").append("/etc/app.toml");
/// ```
#[macro_export]
macro_rules! stream {
    (logger: $name:expr, $lvl:expr) => {
        $crate::__private::stream(
            $name,
            $lvl,
            (::std::file!(), ::std::line!(), ::std::module_path!()),
        )
    };
    ($lvl:expr) => {
        $crate::stream!(logger: $crate::DEFAULT_LOGGER, $lvl)
    };
}

#[doc(hidden)]
pub mod __private {
    use std::fmt;

    use crate::logger::payload_of;
    use crate::record::Level;
    use crate::record::Location;
    use crate::record::Record;
    use crate::registry::registry;
    use crate::stream::LogStream;

    pub fn log(
        name: &str,
        level: Level,
        (file, line, module): (&'static str, u32, &'static str),
        args: fmt::Arguments,
    ) {
        let Some(logger) = registry().get_logger(name) else {
            return;
        };
        if !logger.enabled(level) {
            return;
        }

        let record = Record::builder()
            .level(level)
            .payload(payload_of(args))
            .location(file, line, module)
            .build();
        logger.push_record(&record);
    }

    pub fn stream(
        name: &str,
        level: Level,
        (file, line, module): (&'static str, u32, &'static str),
    ) -> LogStream {
        LogStream::new(registry().get_logger(name), level)
            .with_location(Location::new(file, line, module))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::Level;
    use crate::layout::CustomLayout;
    use crate::record::Record;
    use crate::registry::registry;
    use crate::sink::SinkOptions;
    use crate::sink::testkit::Memory;

    #[test]
    fn test_macros_route_to_named_logger() {
        let logger = registry().create_logger("macros::named").unwrap();
        logger.set_level(Level::Debug);
        let layout = CustomLayout::new(|record: &Record, _: bool| {
            let location = record.location().unwrap();
            assert!(location.file().ends_with("macros.rs"));
            assert_eq!(location.function(), module_path!());
            Ok(format!("{} {}", record.level(), record.payload()))
        });
        let sink = logger.create_sink(Memory::with_options(
            SinkOptions::default().with_layout(layout),
        ));

        trace!(logger: "macros::named", "filtered {}", 1);
        debug!(logger: "macros::named", "cache size {}", 128);
        info!(logger: "macros::named", "static message");
        warn!(logger: "macros::named", "slow query: {}ms", 900);
        error!(logger: "macros::named", "{}", "disk failure");
        fatal!(logger: "macros::named", "giving up");
        log!(logger: "macros::named", Level::Info, "explicit {}", "level");
        {
            let mut out = stream!(logger: "macros::named", Level::Warn);
            out.append("streamed ").append(42);
        }

        assert_eq!(
            sink.lines(),
            vec![
                "DEBUG cache size 128",
                "INFO static message",
                "WARN slow query: 900ms",
                "ERROR disk failure",
                "FATAL giving up",
                "INFO explicit level",
                "WARN streamed 42",
            ]
        );
        registry().erase_logger("macros::named");
    }

    #[test]
    fn test_absent_logger_is_noop() {
        struct Explodes;
        impl std::fmt::Display for Explodes {
            fn fmt(&self, _: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                panic!("arguments must not be formatted");
            }
        }

        info!(logger: "macros::absent", "never {}", Explodes);
        let mut out = stream!(logger: "macros::absent", Level::Fatal);
        out.append("ignored");
        assert!(!out.is_enabled());

        let logger = Arc::new(crate::Logger::new("macros::filtered"));
        logger.set_level(Level::Error);
        registry().add_logger(logger).unwrap();
        debug!(logger: "macros::filtered", "never {}", Explodes);
        registry().erase_logger("macros::filtered");
    }
}
