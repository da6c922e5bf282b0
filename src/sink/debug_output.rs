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

use windows_sys::Win32::System::Diagnostics::Debug::OutputDebugStringW;

use crate::Error;
use crate::Layout;
use crate::encoding::utf8_to_wide;
use crate::record::Level;
use crate::record::Record;
use crate::sink::Sink;
use crate::sink::SinkOptions;

/// A sink that sends log records to the debugger attached to the process.
///
/// Text goes through `OutputDebugStringW`, so it shows up in the debugger output window or any
/// tool listening for debug strings. Without a listener the call does nothing.
///
/// # Examples
///
/// ```
/// use logsink::Level;
/// use logsink::sink::DebugOutput;
///
/// let sink = DebugOutput::default().with_level(Level::Debug);
/// ```
#[derive(Debug, Default)]
pub struct DebugOutput {
    options: SinkOptions,
}

impl DebugOutput {
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
}

impl Sink for DebugOutput {
    fn options(&self) -> &SinkOptions {
        &self.options
    }

    fn write(&self, _: &Record, text: String) -> Result<(), Error> {
        let mut wide = utf8_to_wide(&text);
        wide.push(0);
        // SAFETY: `wide` is a NUL-terminated UTF-16 buffer that outlives the call.
        unsafe { OutputDebugStringW(wide.as_ptr()) };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::CustomLayout;

    #[test]
    fn test_write_without_debugger() {
        let sink = DebugOutput::default()
            .with_level(Level::Info)
            .with_layout(CustomLayout::new(|record: &Record, _: bool| {
                Ok(format!("{}\n", record.payload()))
            }));
        assert_eq!(sink.level(), Level::Info);
        sink.consume(&Record::new(Level::Warn, "デバッグ出力"));
        assert!(sink.write(&Record::new(Level::Info, ""), String::new()).is_ok());
    }
}
