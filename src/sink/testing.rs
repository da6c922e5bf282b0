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

use crate::Error;
use crate::Layout;
use crate::record::Record;
use crate::sink::Sink;
use crate::sink::SinkOptions;

/// A sink that writes log records that can be captured by a test harness (like `cargo test`),
/// and thus the outputs are suppressed unless `--nocapture` or `--show-output` is specified.
///
/// # Examples
///
/// ```
/// use logsink::sink::Testing;
///
/// let test_sink = Testing::default();
/// ```
#[derive(Debug, Default)]
pub struct Testing {
    options: SinkOptions,
}

impl Testing {
    /// Set the layout for the [`Testing`] sink.
    ///
    /// Default to [`TextLayout`](crate::layout::TextLayout).
    pub fn with_layout(mut self, layout: impl Into<Box<dyn Layout>>) -> Self {
        self.options = self.options.with_layout(layout);
        self
    }
}

impl Sink for Testing {
    fn options(&self) -> &SinkOptions {
        &self.options
    }

    fn write(&self, _: &Record, text: String) -> Result<(), Error> {
        eprint!("{text}");
        Ok(())
    }
}
