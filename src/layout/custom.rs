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

use std::fmt::Debug;
use std::fmt::Formatter;

use crate::Error;
use crate::layout::Layout;
use crate::record::Record;

type FormatFunction = dyn Fn(&Record, bool) -> Result<String, Error> + Send + Sync + 'static;

/// A layout that you can pass the custom layout function.
///
/// The function receives the record and the verbosity flag of the consuming sink, and returns
/// the complete text to write, line terminator included. For example:
///
/// ```rust
/// use logsink::layout::CustomLayout;
/// use logsink::record::Record;
///
/// let layout = CustomLayout::new(|record: &Record, _verbose: bool| {
///     Ok(format!("{} - {}\n", record.level(), record.payload()))
/// });
/// ```
pub struct CustomLayout {
    f: Box<FormatFunction>,
}

impl Debug for CustomLayout {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "CustomLayout {{ ... }}")
    }
}

impl CustomLayout {
    /// Create a layout from a format function.
    pub fn new(
        layout: impl Fn(&Record, bool) -> Result<String, Error> + Send + Sync + 'static,
    ) -> Self {
        CustomLayout {
            f: Box::new(layout),
        }
    }
}

impl Layout for CustomLayout {
    fn format(&self, record: &Record, verbose: bool) -> Result<String, Error> {
        (self.f)(record, verbose)
    }
}
