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

//! Sinks write formatted log records to their output targets.

use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicU8;
use std::sync::atomic::Ordering;

use crate::Error;
use crate::Layout;
use crate::Trap;
use crate::layout::TextLayout;
use crate::record::Level;
use crate::record::Record;
use crate::trap::SilentTrap;

mod adapter;
mod console;
#[cfg(windows)]
mod debug_output;
mod file;
mod testing;

pub use self::adapter::SinkAdapter;
pub use self::console::Console;
pub use self::console::ConsoleTarget;
#[cfg(windows)]
pub use self::debug_output::DebugOutput;
pub use self::file::DEFAULT_MAX_SIZE;
pub use self::file::File;
pub use self::file::FileBuilder;
pub use self::file::OpenMode;
pub use self::testing::Testing;

/// A destination for log records.
///
/// Implementors provide [`options`](Sink::options) and [`write`](Sink::write); the level
/// filter, verbosity and error routing of [`consume`](Sink::consume) come for free.
pub trait Sink: fmt::Debug + Send + Sync + 'static {
    /// The shared configuration of this sink.
    fn options(&self) -> &SinkOptions;

    /// Write one formatted record to the output target.
    ///
    /// This is the critical section of the sink: implementations serialize it so that records
    /// never interleave on the target.
    fn write(&self, record: &Record, text: String) -> Result<(), Error>;

    /// Whether the sink can still write. A closed sink drops every record.
    ///
    /// Default to `true`.
    fn is_open(&self) -> bool {
        true
    }

    /// Flush any buffered records.
    ///
    /// Default to a no-op.
    fn flush(&self) -> Result<(), Error> {
        Ok(())
    }

    /// The minimum level this sink writes.
    fn level(&self) -> Level {
        self.options().level()
    }

    /// Set the minimum level this sink writes.
    fn set_level(&self, level: Level) {
        self.options().set_level(level)
    }

    /// Whether layouts render call-site locations for this sink.
    fn is_verbose(&self) -> bool {
        self.options().is_verbose()
    }

    /// Toggle call-site locations for this sink.
    fn set_verbose(&self, verbose: bool) {
        self.options().set_verbose(verbose)
    }

    /// Filter, format and write a record.
    ///
    /// Formatting happens before the critical section. Errors are handed to the sink's trap and
    /// never returned to the caller.
    fn consume(&self, record: &Record) {
        if !self.is_open() || record.level() < self.level() {
            return;
        }

        let options = self.options();
        let result = options
            .layout()
            .format(record, options.is_verbose())
            .and_then(|text| self.write(record, text));
        if let Err(err) = result {
            options.trap().trap(&err);
        }
    }
}

/// Configuration every sink carries: layout, level, verbosity and trap.
///
/// Level and verbosity can be changed at run time through a shared reference.
#[derive(Debug)]
pub struct SinkOptions {
    layout: Box<dyn Layout>,
    level: AtomicU8,
    verbose: AtomicBool,
    trap: Box<dyn Trap>,
}

impl Default for SinkOptions {
    fn default() -> Self {
        Self {
            layout: Box::new(TextLayout::default()),
            level: AtomicU8::new(Level::Trace as u8),
            verbose: AtomicBool::new(false),
            trap: Box::new(SilentTrap::default()),
        }
    }
}

impl SinkOptions {
    /// Set the layout. Default to [`TextLayout`].
    pub fn with_layout(mut self, layout: impl Into<Box<dyn Layout>>) -> Self {
        self.layout = layout.into();
        self
    }

    /// Set the minimum level. Default to [`Level::Trace`].
    pub fn with_level(self, level: Level) -> Self {
        self.set_level(level);
        self
    }

    /// Set verbosity. Default to `false`.
    pub fn with_verbose(self, verbose: bool) -> Self {
        self.set_verbose(verbose);
        self
    }

    /// Set the trap. Default to [`SilentTrap`].
    pub fn with_trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = trap.into();
        self
    }

    /// The layout.
    pub fn layout(&self) -> &dyn Layout {
        self.layout.as_ref()
    }

    /// The trap.
    pub fn trap(&self) -> &dyn Trap {
        self.trap.as_ref()
    }

    /// The minimum level.
    pub fn level(&self) -> Level {
        Level::from_u8(self.level.load(Ordering::Relaxed)).unwrap_or(Level::Trace)
    }

    /// Set the minimum level.
    pub fn set_level(&self, level: Level) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    /// Whether call-site locations are rendered.
    pub fn is_verbose(&self) -> bool {
        self.verbose.load(Ordering::Relaxed)
    }

    /// Toggle call-site locations.
    pub fn set_verbose(&self, verbose: bool) {
        self.verbose.store(verbose, Ordering::Relaxed);
    }
}


#[cfg(test)]
mod tests {
    use super::testkit::Memory;
    use super::testkit::Recorder;
    use super::*;
    use crate::ErrorKind;
    use crate::layout::CustomLayout;

    fn bare_layout() -> CustomLayout {
        CustomLayout::new(|record: &Record, verbose: bool| {
            let suffix = if verbose { " +v" } else { "" };
            Ok(format!("{} {}{suffix}", record.level(), record.payload()))
        })
    }

    #[test]
    fn test_consume_filters_by_sink_level() {
        let sink = Memory::with_options(
            SinkOptions::default()
                .with_layout(bare_layout())
                .with_level(Level::Warn),
        );
        for level in Level::ALL {
            sink.consume(&Record::new(level, "msg"));
        }
        assert_eq!(sink.lines(), vec!["WARN msg", "ERROR msg", "FATAL msg"]);

        sink.set_level(Level::Fatal);
        sink.set_verbose(true);
        sink.consume(&Record::new(Level::Error, "dropped"));
        sink.consume(&Record::new(Level::Fatal, "kept"));
        assert_eq!(sink.lines().last().unwrap(), "FATAL kept +v");
    }

    #[test]
    fn test_layout_errors_go_to_trap() {
        let recorder = Recorder::default();
        let layout = CustomLayout::new(|_: &Record, _: bool| {
            Err(Error::new(ErrorKind::Unexpected, "layout exploded"))
        });
        let sink = Memory::with_options(
            SinkOptions::default()
                .with_layout(layout)
                .with_trap(recorder.clone()),
        );

        sink.consume(&Record::new(Level::Info, "msg"));
        assert!(sink.lines().is_empty());
        assert_eq!(*recorder.errors.lock().unwrap(), vec!["layout exploded"]);
    }
}
