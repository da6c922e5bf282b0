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

use std::fmt;
use std::mem;
use std::sync::Arc;

use crate::logger::Logger;
use crate::record::Level;
use crate::record::Location;
use crate::record::Record;

/// A scoped message builder.
///
/// Text written to the stream is logged as a single record when the stream is dropped, or
/// earlier through [`finish`](LogStream::finish). A stream without a logger, or whose level
/// the logger filters out, discards everything.
///
/// # Examples
///
/// ```
/// use std::fmt::Write;
/// use std::sync::Arc;
///
/// use logsink::Level;
/// use logsink::Logger;
///
/// let logger = Arc::new(Logger::new("app"));
/// let mut stream = logger.stream(Level::Info);
/// stream.append("loaded ").append(3).append(" plugins");
/// write!(stream, " in {}ms", 12).unwrap();
/// stream.finish();
/// ```
#[derive(Debug)]
pub struct LogStream {
    logger: Option<Arc<Logger>>,
    level: Level,
    location: Option<Location>,
    text: String,
}

impl LogStream {
    /// Create a stream logging to `logger` at `level`.
    pub fn new(logger: Option<Arc<Logger>>, level: Level) -> Self {
        Self {
            logger: logger.filter(|logger| logger.enabled(level)),
            level,
            location: None,
            text: String::new(),
        }
    }

    /// Attach a call-site location to the record.
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Whether anything written to this stream will be logged.
    pub fn is_enabled(&self) -> bool {
        self.logger.is_some()
    }

    /// Append a displayable value.
    pub fn append(&mut self, value: impl fmt::Display) -> &mut Self {
        if self.is_enabled() {
            use fmt::Write;
            // writing to a String cannot fail
            let _ = write!(self.text, "{value}");
        }
        self
    }

    /// Log the accumulated text now.
    pub fn finish(self) {}
}

impl fmt::Write for LogStream {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.is_enabled() {
            self.text.push_str(s);
        }
        Ok(())
    }
}

impl Drop for LogStream {
    fn drop(&mut self) {
        let Some(logger) = self.logger.take() else {
            return;
        };

        let mut builder = Record::builder()
            .level(self.level)
            .payload(mem::take(&mut self.text));
        if let Some(location) = self.location.take() {
            builder = builder.location(
                location.file().to_owned(),
                location.line(),
                location.function().to_owned(),
            );
        }
        logger.push_record(&builder.build());
    }
}
