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

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use std::sync::RwLock;
use std::sync::atomic::AtomicU8;
use std::sync::atomic::Ordering;

use crate::record::Level;
use crate::record::Record;
use crate::record::WideRecord;
use crate::sink::Sink;
use crate::sink::SinkAdapter;
use crate::stream::LogStream;

/// A named logger that fans records out to its sinks.
///
/// A record reaches a sink only if its level passes both the logger's level and the sink's own
/// level. Sinks are visited in the order they were attached.
///
/// # Examples
///
/// ```
/// use logsink::Level;
/// use logsink::Logger;
/// use logsink::sink::Testing;
///
/// let logger = Logger::new("app");
/// logger.create_sink(Testing::default());
/// logger.set_level(Level::Info);
/// logger.log(Level::Info, format_args!("listening on {}", 8080));
/// ```
#[derive(Debug)]
pub struct Logger {
    name: String,
    level: AtomicU8,
    // copy-on-write; dispatch runs on a snapshot without holding the lock
    adapters: RwLock<Arc<Vec<SinkAdapter>>>,
}

impl Logger {
    /// Create a logger without sinks, accepting every level.
    pub fn new(name: impl Into<String>) -> Self {
        Logger::with_level(name, Level::Trace)
    }

    pub(crate) fn with_level(name: impl Into<String>, level: Level) -> Self {
        Self {
            name: name.into(),
            level: AtomicU8::new(level as u8),
            adapters: RwLock::default(),
        }
    }

    /// The name of this logger.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The minimum level this logger forwards.
    pub fn level(&self) -> Level {
        Level::from_u8(self.level.load(Ordering::Relaxed)).unwrap_or(Level::Trace)
    }

    /// Set the minimum level this logger forwards.
    pub fn set_level(&self, level: Level) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    /// Whether a record at `level` passes this logger's filter.
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.level()
    }

    /// Attach a shared sink, returning it for further configuration.
    ///
    /// The same sink may be attached to several loggers.
    pub fn add_sink<S: Sink>(&self, sink: Arc<S>) -> Arc<S> {
        let mut adapters = self.adapters.write().unwrap_or_else(|e| e.into_inner());
        Arc::make_mut(&mut adapters).push(SinkAdapter::new(sink.clone()));
        sink
    }

    /// Attach a new sink, returning a handle to it.
    pub fn create_sink<S: Sink>(&self, sink: S) -> Arc<S> {
        self.add_sink(Arc::new(sink))
    }

    /// The attached sinks, in attachment order.
    pub fn sinks(&self) -> Vec<Arc<dyn Sink>> {
        self.adapters()
            .iter()
            .map(|adapter| adapter.sink().clone())
            .collect()
    }

    /// Dispatch a record to every open sink.
    pub fn push_record(&self, record: &Record) {
        if !self.enabled(record.level()) {
            return;
        }
        for adapter in self.adapters().iter().filter(|a| a.is_open()) {
            adapter.consume(record);
        }
    }

    /// Dispatch a wide record to every open sink.
    pub fn push_wide_record(&self, record: &WideRecord) {
        if !self.enabled(record.level()) {
            return;
        }
        for adapter in self.adapters().iter().filter(|a| a.is_open()) {
            adapter.consume_wide(record);
        }
    }

    /// Log a formatted message. Arguments are only formatted if the level is enabled.
    pub fn log(&self, level: Level, args: fmt::Arguments) {
        if !self.enabled(level) {
            return;
        }
        self.push_record(&Record::new(level, payload_of(args)));
    }

    /// Start a scoped builder whose accumulated text is logged as one record when dropped.
    pub fn stream(self: &Arc<Self>, level: Level) -> LogStream {
        LogStream::new(Some(self.clone()), level)
    }

    /// Flush every attached sink. Failures go to each sink's trap.
    pub fn flush(&self) {
        for adapter in self.adapters().iter() {
            let sink = adapter.sink();
            if let Err(err) = sink.flush() {
                sink.options().trap().trap(&err);
            }
        }
    }

    fn adapters(&self) -> Arc<Vec<SinkAdapter>> {
        self.adapters.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

pub(crate) fn payload_of(args: fmt::Arguments) -> Cow<'static, str> {
    match args.as_str() {
        Some(s) => Cow::Borrowed(s),
        None => Cow::Owned(args.to_string()),
    }
}
