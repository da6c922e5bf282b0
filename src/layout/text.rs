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

use std::fmt::Write;

use jiff::tz::TimeZone;

use crate::Error;
use crate::layout::Layout;
use crate::record::Location;
use crate::record::Record;

/// A layout that formats a log record as a single line of plain text.
///
/// Output format:
///
/// ```text
/// 2024-08-11 22:44:57.172105 [ERROR] #1 Hello error!
/// 2024-08-11 22:44:57.172219 [WARN] #1 Hello warn!
/// 2024-08-11 22:44:57.172276 [INFO] #2 Hello info! (src/main.rs, 53, app::worker)
/// ```
///
/// The location suffix is only rendered for records carrying a location, and only when the
/// consuming sink is verbose. Every line ends with exactly one `\n`, whether or not the message
/// already had one.
///
/// You can customize the timezone of the timestamp by setting the `tz` field with a [`TimeZone`]
/// instance. Otherwise, the system timezone is used.
///
/// # Examples
///
/// ```
/// use logsink::layout::TextLayout;
///
/// let layout = TextLayout::default();
/// ```
#[derive(Debug, Clone)]
pub struct TextLayout {
    timezone: TimeZone,
}

impl Default for TextLayout {
    fn default() -> Self {
        Self {
            timezone: TimeZone::system(),
        }
    }
}

impl TextLayout {
    /// Set the timezone for timestamps.
    ///
    /// Defaults to the system timezone if not set.
    ///
    /// # Examples
    ///
    /// ```
    /// use jiff::tz::TimeZone;
    /// use logsink::layout::TextLayout;
    ///
    /// let layout = TextLayout::default().timezone(TimeZone::UTC);
    /// ```
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.timezone = tz;
        self
    }
}

/// Render `YYYY-MM-DD HH:MM:SS.ffffff` in the given timezone.
pub(crate) fn write_time(text: &mut String, record: &Record, tz: &TimeZone) -> Result<(), Error> {
    let dt = tz.to_datetime(record.time());
    write!(
        text,
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}.{:06}",
        dt.year(),
        dt.month(),
        dt.day(),
        dt.hour(),
        dt.minute(),
        dt.second(),
        dt.subsec_nanosecond() / 1000,
    )
    .map_err(Error::from_fmt_error)
}

pub(crate) fn write_location(text: &mut String, location: &Location) -> Result<(), Error> {
    write!(
        text,
        " ({}, {}, {})",
        location.file(),
        location.line(),
        location.function()
    )
    .map_err(Error::from_fmt_error)
}

impl Layout for TextLayout {
    fn format(&self, record: &Record, verbose: bool) -> Result<String, Error> {
        let message = record.payload();
        let mut text = String::with_capacity(message.len() + 48);

        write_time(&mut text, record, &self.timezone)?;
        write!(text, " [{}] #{} ", record.level(), record.thread_id())
            .map_err(Error::from_fmt_error)?;
        text.push_str(message.strip_suffix('\n').unwrap_or(message));

        if verbose {
            if let Some(location) = record.location() {
                write_location(&mut text, location)?;
            }
        }

        text.push('\n');
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::record::Level;

    fn record(payload: &'static str) -> Record {
        let ts: Timestamp = "2024-08-11T14:44:57.172105Z".parse().unwrap();
        Record::builder()
            .time(ts)
            .level(Level::Error)
            .thread_id(3)
            .payload(payload)
            .location("src/server.rs", 118, "server::accept")
            .build()
    }

    #[test]
    fn test_format_plain() {
        let layout = TextLayout::default().timezone(TimeZone::UTC);
        let text = layout.format(&record("connection reset"), false).unwrap();
        insta::assert_snapshot!(text.trim_end(), @"2024-08-11 14:44:57.172105 [ERROR] #3 connection reset");
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_terminator_is_idempotent() {
        let layout = TextLayout::default().timezone(TimeZone::UTC);
        let once = layout.format(&record("done"), false).unwrap();
        let twice = layout.format(&record("done\n"), false).unwrap();
        assert_eq!(once, twice);
        assert_eq!(once.matches('\n').count(), 1);
    }

    #[test]
    fn test_verbose_location_goes_before_terminator() {
        let layout = TextLayout::default().timezone(TimeZone::UTC);
        let text = layout.format(&record("accept failed\n"), true).unwrap();
        assert_eq!(
            text,
            "2024-08-11 14:44:57.172105 [ERROR] #3 accept failed (src/server.rs, 118, server::accept)\n"
        );

        let plain = Record::builder()
            .time("2024-08-11T14:44:57Z".parse().unwrap())
            .level(Level::Info)
            .thread_id(1)
            .payload("no location")
            .build();
        let text = layout.format(&plain, true).unwrap();
        assert_eq!(text, "2024-08-11 14:44:57.000000 [INFO] #1 no location\n");
    }

    #[test]
    fn test_timezone_is_applied() {
        let tz = TimeZone::fixed(jiff::tz::offset(8));
        let layout = TextLayout::default().timezone(tz);
        let text = layout.format(&record("east"), false).unwrap();
        assert!(text.starts_with("2024-08-11 22:44:57.172105 "), "{text}");
    }
}
