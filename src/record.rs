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

//! Log record, severity level and thread identity.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use jiff::Timestamp;

use crate::Error;
use crate::ErrorKind;

/// An enum representing the available severity levels of a record.
///
/// Levels are totally ordered from the most verbose to the most severe.
#[repr(u8)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Level {
    /// Designates very low priority, often extremely verbose, information.
    Trace = 0,
    /// Designates lower priority information.
    Debug = 1,
    /// Designates useful information.
    Info = 2,
    /// Designates hazardous situations.
    Warn = 3,
    /// Designates very serious errors.
    Error = 4,
    /// Designates errors the program cannot recover from.
    Fatal = 5,
}

impl Level {
    /// All levels, from the most verbose to the most severe.
    pub const ALL: [Level; 6] = [
        Level::Trace,
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Fatal,
    ];

    /// Return the string representation of the `Level`.
    ///
    /// This returns the same string as the `fmt::Display` implementation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
        }
    }

    /// Convert a raw level value, returning `None` if it is out of range.
    pub fn from_u8(raw: u8) -> Option<Level> {
        Level::ALL.get(raw as usize).copied()
    }

    /// Return the canonical name of a raw level value.
    ///
    /// Out of range values render as `UNKNOWN`.
    ///
    /// # Examples
    ///
    /// ```
    /// use logsink::Level;
    ///
    /// assert_eq!(Level::name_of(3), "WARN");
    /// assert_eq!(Level::name_of(42), "UNKNOWN");
    /// ```
    pub fn name_of(raw: u8) -> &'static str {
        Level::from_u8(raw).map_or("UNKNOWN", |level| level.as_str())
    }
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;
    fn from_str(s: &str) -> Result<Level, Self::Err> {
        for level in Level::ALL {
            if s.eq_ignore_ascii_case(level.as_str()) {
                return Ok(level);
            }
        }

        Err(Error::new(
            ErrorKind::Malformed,
            format!("malformed level: {s:?}"),
        ))
    }
}

static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(0);

thread_local! {
    static THREAD_ID: u64 = NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed) + 1;
}

/// Return the small integer identifying the current thread in log records.
///
/// Ids are assigned on first use, starting at 1, and stay fixed for the thread's lifetime.
pub fn current_thread_id() -> u64 {
    THREAD_ID.with(|id| *id)
}

/// The call-site location attached to an extended record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    file: Cow<'static, str>,
    line: u32,
    function: Cow<'static, str>,
}

impl Location {
    /// Create a location.
    pub fn new(
        file: impl Into<Cow<'static, str>>,
        line: u32,
        function: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            file: file.into(),
            line,
            function: function.into(),
        }
    }

    /// The source file.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// The source line.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// The enclosing function or module.
    pub fn function(&self) -> &str {
        &self.function
    }
}

/// The payload of a log message.
#[derive(Clone, Debug)]
pub struct Record {
    time: Timestamp,
    level: Level,
    thread_id: u64,
    payload: Cow<'static, str>,
    location: Option<Location>,
}

impl Record {
    /// Create a record stamped with the current time and thread.
    pub fn new(level: Level, payload: impl Into<Cow<'static, str>>) -> Self {
        Record::builder().level(level).payload(payload).build()
    }

    /// Returns a new builder.
    pub fn builder() -> RecordBuilder {
        RecordBuilder::default()
    }

    /// The observed time.
    pub fn time(&self) -> Timestamp {
        self.time
    }

    /// Whole seconds of the observed time since the Unix epoch.
    pub fn seconds(&self) -> i64 {
        self.time.as_second()
    }

    /// Microsecond remainder of the observed time.
    pub fn micros(&self) -> u32 {
        (self.time.subsec_nanosecond() / 1000).unsigned_abs()
    }

    /// The severity level of the message.
    pub fn level(&self) -> Level {
        self.level
    }

    /// The id of the thread that built the record.
    pub fn thread_id(&self) -> u64 {
        self.thread_id
    }

    /// The message body.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// The call-site location, present only on extended records.
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }
}

/// Builder for [`Record`].
#[derive(Debug)]
pub struct RecordBuilder {
    record: Record,
}

impl Default for RecordBuilder {
    fn default() -> Self {
        RecordBuilder {
            record: Record {
                time: Timestamp::now(),
                level: Level::Info,
                thread_id: current_thread_id(),
                payload: Cow::Borrowed(""),
                location: None,
            },
        }
    }
}

impl RecordBuilder {
    /// Set [`time`](Record::time).
    pub fn time(mut self, time: Timestamp) -> Self {
        self.record.time = time;
        self
    }

    /// Set [`level`](Record::level).
    pub fn level(mut self, level: Level) -> Self {
        self.record.level = level;
        self
    }

    /// Set [`thread_id`](Record::thread_id).
    pub fn thread_id(mut self, thread_id: u64) -> Self {
        self.record.thread_id = thread_id;
        self
    }

    /// Set [`payload`](Record::payload).
    pub fn payload(mut self, payload: impl Into<Cow<'static, str>>) -> Self {
        self.record.payload = payload.into();
        self
    }

    /// Set [`location`](Record::location), turning this into an extended record.
    pub fn location(
        mut self,
        file: impl Into<Cow<'static, str>>,
        line: u32,
        function: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.record.location = Some(Location::new(file, line, function));
        self
    }

    /// Invoke the builder and return a `Record`
    pub fn build(self) -> Record {
        self.record
    }
}

/// A record whose text fields are UTF-16 code units.
///
/// Loggers accept these alongside [`Record`] and convert them per sink.
#[derive(Clone, Debug)]
pub struct WideRecord {
    time: Timestamp,
    level: Level,
    thread_id: u64,
    payload: Vec<u16>,
    location: Option<WideLocation>,
}

/// The call-site location of a [`WideRecord`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WideLocation {
    /// The source file.
    pub file: Vec<u16>,
    /// The source line.
    pub line: u32,
    /// The enclosing function or module.
    pub function: Vec<u16>,
}

impl WideRecord {
    /// Create a wide record stamped with the current time and thread.
    pub fn new(level: Level, payload: impl Into<Vec<u16>>) -> Self {
        WideRecord::builder().level(level).payload(payload).build()
    }

    /// Returns a new builder.
    pub fn builder() -> WideRecordBuilder {
        WideRecordBuilder::default()
    }

    /// The observed time.
    pub fn time(&self) -> Timestamp {
        self.time
    }

    /// The severity level of the message.
    pub fn level(&self) -> Level {
        self.level
    }

    /// The id of the thread that built the record.
    pub fn thread_id(&self) -> u64 {
        self.thread_id
    }

    /// The message body as UTF-16 code units.
    pub fn payload(&self) -> &[u16] {
        &self.payload
    }

    /// The call-site location, present only on extended records.
    pub fn location(&self) -> Option<&WideLocation> {
        self.location.as_ref()
    }
}

/// Builder for [`WideRecord`].
#[derive(Debug)]
pub struct WideRecordBuilder {
    record: WideRecord,
}

impl Default for WideRecordBuilder {
    fn default() -> Self {
        WideRecordBuilder {
            record: WideRecord {
                time: Timestamp::now(),
                level: Level::Info,
                thread_id: current_thread_id(),
                payload: Vec::new(),
                location: None,
            },
        }
    }
}

impl WideRecordBuilder {
    /// Set [`time`](WideRecord::time).
    pub fn time(mut self, time: Timestamp) -> Self {
        self.record.time = time;
        self
    }

    /// Set [`level`](WideRecord::level).
    pub fn level(mut self, level: Level) -> Self {
        self.record.level = level;
        self
    }

    /// Set [`thread_id`](WideRecord::thread_id).
    pub fn thread_id(mut self, thread_id: u64) -> Self {
        self.record.thread_id = thread_id;
        self
    }

    /// Set [`payload`](WideRecord::payload).
    pub fn payload(mut self, payload: impl Into<Vec<u16>>) -> Self {
        self.record.payload = payload.into();
        self
    }

    /// Set [`location`](WideRecord::location).
    pub fn location(
        mut self,
        file: impl Into<Vec<u16>>,
        line: u32,
        function: impl Into<Vec<u16>>,
    ) -> Self {
        self.record.location = Some(WideLocation {
            file: file.into(),
            line,
            function: function.into(),
        });
        self
    }

    /// Invoke the builder and return a `WideRecord`
    pub fn build(self) -> WideRecord {
        self.record
    }
}
