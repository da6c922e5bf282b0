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
use std::io;
use std::io::Write;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use crate::Error;
use crate::Layout;
use crate::Trap;
use crate::record::Level;
use crate::record::Record;
use crate::sink::Sink;
use crate::sink::SinkOptions;

/// The standard stream a [`Console`] writes to.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleTarget {
    /// Standard output.
    #[default]
    Stdout,
    /// Standard error.
    Stderr,
}

/// A sink that prints log records to standard output or standard error.
///
/// With the `colored` feature, each line is colored by level:
///
/// | level | color |
/// |-------|-------|
/// | TRACE | white |
/// | DEBUG | cyan |
/// | INFO  | green |
/// | WARN  | bold yellow |
/// | ERROR | bold red |
/// | FATAL | bold white on red |
///
/// # Examples
///
/// ```
/// use logsink::Level;
/// use logsink::sink::Console;
/// use logsink::sink::ConsoleTarget;
///
/// let console = Console::default()
///     .with_target(ConsoleTarget::Stderr)
///     .with_level(Level::Warn);
/// ```
#[derive(Debug)]
pub struct Console {
    target: ConsoleTarget,
    options: SinkOptions,
    color: AtomicBool,
}

impl Default for Console {
    fn default() -> Self {
        Self {
            target: ConsoleTarget::default(),
            options: SinkOptions::default(),
            color: AtomicBool::new(cfg!(feature = "colored")),
        }
    }
}

impl Console {
    /// Set the output stream. Default to [`ConsoleTarget::Stdout`].
    pub fn with_target(mut self, target: ConsoleTarget) -> Self {
        self.target = target;
        self
    }

    /// Set the layout. Default to [`TextLayout`](crate::layout::TextLayout).
    pub fn with_layout(mut self, layout: impl Into<Box<dyn Layout>>) -> Self {
        self.options = self.options.with_layout(layout);
        self
    }

    /// Set the minimum level. Default to [`Level::Trace`].
    pub fn with_level(self, level: Level) -> Self {
        self.options.set_level(level);
        self
    }

    /// Render call-site locations. Default to `false`.
    pub fn with_verbose(self, verbose: bool) -> Self {
        self.options.set_verbose(verbose);
        self
    }

    /// Set the trap for handling errors during logging.
    ///
    /// Default to [`SilentTrap`](crate::trap::SilentTrap).
    pub fn with_trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.options = self.options.with_trap(trap);
        self
    }

    /// Toggle colored output. Has no effect without the `colored` feature.
    pub fn enable_color(&self, enable: bool) {
        self.color.store(enable, Ordering::Relaxed);
    }

    /// Whether colored output is enabled.
    pub fn is_color_enabled(&self) -> bool {
        self.color.load(Ordering::Relaxed)
    }

    /// Apply the level color to every line of `text`, leaving line terminators uncolored.
    pub fn render<'a>(&self, level: Level, text: &'a str) -> Cow<'a, str> {
        if !self.is_color_enabled() {
            return Cow::Borrowed(text);
        }
        paint(level, text)
    }
}

#[cfg(feature = "colored")]
fn paint(level: Level, text: &str) -> Cow<'_, str> {
    use std::fmt::Write;

    use colored::Colorize;

    let mut out = String::with_capacity(text.len() + 16);
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if line.is_empty() {
            continue;
        }
        let painted = match level {
            Level::Trace => line.white(),
            Level::Debug => line.cyan(),
            Level::Info => line.green(),
            Level::Warn => line.yellow().bold(),
            Level::Error => line.red().bold(),
            Level::Fatal => line.white().bold().on_red(),
        };
        // writing to a String cannot fail
        let _ = write!(out, "{painted}");
    }
    Cow::Owned(out)
}

#[cfg(not(feature = "colored"))]
fn paint(_: Level, text: &str) -> Cow<'_, str> {
    Cow::Borrowed(text)
}

impl Sink for Console {
    fn options(&self) -> &SinkOptions {
        &self.options
    }

    fn write(&self, record: &Record, text: String) -> Result<(), Error> {
        let text = self.render(record.level(), &text);
        match self.target {
            ConsoleTarget::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(text.as_bytes())
                    .and_then(|()| out.flush())
                    .map_err(Error::from_io_error)
            }
            ConsoleTarget::Stderr => {
                let mut out = io::stderr().lock();
                out.write_all(text.as_bytes())
                    .and_then(|()| out.flush())
                    .map_err(Error::from_io_error)
            }
        }
    }

    fn flush(&self) -> Result<(), Error> {
        match self.target {
            ConsoleTarget::Stdout => io::stdout().flush(),
            ConsoleTarget::Stderr => io::stderr().flush(),
        }
        .map_err(Error::from_io_error)
    }
}
