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

//! Layouts for formatting log records.

use std::fmt;

use crate::Error;
use crate::record::Record;

mod banner;
mod custom;
mod page;
mod text;

pub use self::banner::banner;
pub use self::custom::CustomLayout;
pub use self::page::PageLayout;
pub use self::text::TextLayout;

/// A layout for formatting log records.
pub trait Layout: fmt::Debug + Send + Sync + 'static {
    /// Formats a log record into text.
    ///
    /// `verbose` is the verbosity flag of the consuming sink; layouts render the call-site
    /// location of extended records only when it is set.
    fn format(&self, record: &Record, verbose: bool) -> Result<String, Error>;
}

impl<T: Layout> From<T> for Box<dyn Layout> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}
