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
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use jiff::tz::TimeZone;

use crate::Error;
use crate::layout::Layout;
use crate::layout::text::write_location;
use crate::layout::text::write_time;
use crate::record::Record;

const FORM_FEED: char = '\x0c';

/// A layout that joins consecutive records into one line until a record ends with a form feed.
///
/// A record whose message does not end with `\f` opens a line: the header is written followed by
/// the message, with no terminator. Later records are appended to that line without a header.
/// The record whose message ends with `\f` closes the line, its `\f` replaced by `\n`.
///
/// ```text
/// 2024-08-11 22:44:57.172105 [INFO] #1 loading plugins: auth cache metrics done
/// ```
///
/// The open-line flag is shared by every sink using the layout instance and is not guarded
/// against interleaving, so records from concurrent threads may be joined together. Use one
/// layout per sink and write page records from a single thread.
#[derive(Debug)]
pub struct PageLayout {
    timezone: TimeZone,
    in_progress: AtomicBool,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            timezone: TimeZone::system(),
            in_progress: AtomicBool::new(false),
        }
    }
}

impl PageLayout {
    /// Set the timezone for timestamps.
    ///
    /// Defaults to the system timezone if not set.
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.timezone = tz;
        self
    }

    /// Whether a line has been opened and not yet closed.
    pub fn in_progress(&self) -> bool {
        self.in_progress.load(Ordering::Relaxed)
    }
}

impl Layout for PageLayout {
    fn format(&self, record: &Record, verbose: bool) -> Result<String, Error> {
        let message = record.payload();
        let mut text = String::with_capacity(message.len() + 48);

        if !self.in_progress() {
            write_time(&mut text, record, &self.timezone)?;
            if verbose {
                if let Some(location) = record.location() {
                    write_location(&mut text, location)?;
                }
            }
            write!(text, " [{}] #{} ", record.level(), record.thread_id())
                .map_err(Error::from_fmt_error)?;
        }

        match message.strip_suffix(FORM_FEED) {
            Some(body) => {
                text.push_str(body);
                text.push('\n');
                self.in_progress.store(false, Ordering::Relaxed);
            }
            None => {
                text.push_str(message);
                self.in_progress.store(true, Ordering::Relaxed);
            }
        }

        Ok(text)
    }
}
