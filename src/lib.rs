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

//! Logsink is a lightweight logging library built around named loggers and pluggable sinks.
//!
//! # Overview
//!
//! A [`Logger`] filters records by level and fans them out to its sinks. Each [`Sink`] has its
//! own level, verbosity, [`Layout`] and output encoding: the console, a size-rotated file, or
//! anything implementing the trait. Loggers are looked up by name in the global [`Registry`],
//! which is what the logging macros use.
//!
//! Records carry UTF-8 text. Callers holding UTF-16 text can push a [`WideRecord`] instead; it
//! is converted per sink. File sinks re-encode into the charset of the process locale, or any
//! other [`Charset`](encoding::Charset).
//!
//! # Examples
//!
//! ```
//! use logsink::Level;
//! use logsink::sink::Console;
//! use logsink::sink::FileBuilder;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let logger = logsink::registry().create_default_logger().unwrap();
//! logger.create_sink(Console::default().with_level(Level::Warn));
//! logger.create_sink(FileBuilder::utf8(dir.path().join("app.log")).verbose(true).build());
//!
//! logsink::info!("server started on port {}", 8080);
//! logsink::error!("failed to bind {}", "0.0.0.0:443");
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![deny(missing_docs)]

#[cfg(feature = "bridge-log")]
pub mod bridge;
pub mod encoding;
pub mod layout;
pub mod pretty;
pub mod record;
pub mod registry;
pub mod sink;
pub mod trap;

mod error;
mod logger;
mod macros;
mod stream;

pub use self::error::Error;
pub use self::error::ErrorKind;
pub use self::layout::Layout;
pub use self::logger::Logger;
pub use self::record::Level;
pub use self::record::Record;
pub use self::record::WideRecord;
pub use self::registry::DEFAULT_LOGGER;
pub use self::registry::Registry;
pub use self::registry::registry;
pub use self::sink::Sink;
pub use self::stream::LogStream;
pub use self::trap::Trap;

#[doc(hidden)]
pub use self::macros::__private;
