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

//! The directory of named loggers.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::OnceLock;
use std::sync::atomic::AtomicU8;
use std::sync::atomic::Ordering;

use crate::Error;
use crate::ErrorKind;
use crate::logger::Logger;
use crate::record::Level;

/// The name of the logger the logging macros use when no name is given.
pub const DEFAULT_LOGGER: &str = "_DEFAULT_";

/// Return the process-wide registry, creating it on first use.
pub fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(Registry::new)
}

/// A map from unique names to loggers.
///
/// The registry-wide level seeds the level of loggers created afterwards. Changing it does not
/// touch loggers that already exist.
///
/// # Examples
///
/// ```
/// use logsink::Level;
/// use logsink::Registry;
///
/// let registry = Registry::new();
/// registry.set_level(Level::Warn);
/// let logger = registry.create_logger("db").unwrap();
/// assert_eq!(logger.level(), Level::Warn);
/// assert!(registry.create_logger("db").is_err());
/// assert!(registry.get_logger("cache").is_none());
/// ```
#[derive(Debug)]
pub struct Registry {
    loggers: Mutex<HashMap<String, Arc<Logger>>>,
    level: AtomicU8,
}

impl Default for Registry {
    fn default() -> Self {
        Registry::new()
    }
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            loggers: Mutex::new(HashMap::new()),
            level: AtomicU8::new(Level::Trace as u8),
        }
    }

    fn loggers(&self) -> MutexGuard<'_, HashMap<String, Arc<Logger>>> {
        self.loggers.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Create and register a logger at the registry-wide level.
    ///
    /// # Errors
    ///
    /// Return an error of kind [`ErrorKind::AlreadyExists`] if the name is taken.
    pub fn create_logger(&self, name: impl Into<String>) -> Result<Arc<Logger>, Error> {
        let name = name.into();
        let mut loggers = self.loggers();
        if loggers.contains_key(&name) {
            return Err(already_exists(&name));
        }

        let logger = Arc::new(Logger::with_level(name.clone(), self.level()));
        loggers.insert(name, logger.clone());
        Ok(logger)
    }

    /// Create and register the logger named [`DEFAULT_LOGGER`].
    pub fn create_default_logger(&self) -> Result<Arc<Logger>, Error> {
        self.create_logger(DEFAULT_LOGGER)
    }

    /// Register an existing logger under its own name, keeping its level.
    ///
    /// # Errors
    ///
    /// Return an error of kind [`ErrorKind::AlreadyExists`] if the name is taken.
    pub fn add_logger(&self, logger: Arc<Logger>) -> Result<Arc<Logger>, Error> {
        let mut loggers = self.loggers();
        if loggers.contains_key(logger.name()) {
            return Err(already_exists(logger.name()));
        }

        loggers.insert(logger.name().to_owned(), logger.clone());
        Ok(logger)
    }

    /// Look up a logger. An absent logger is an expected outcome, not an error.
    pub fn get_logger(&self, name: &str) -> Option<Arc<Logger>> {
        self.loggers().get(name).cloned()
    }

    /// Look up the logger named [`DEFAULT_LOGGER`].
    pub fn default_logger(&self) -> Option<Arc<Logger>> {
        self.get_logger(DEFAULT_LOGGER)
    }

    /// The names of all registered loggers, in no particular order.
    pub fn names(&self) -> Vec<String> {
        self.loggers().keys().cloned().collect()
    }

    /// Unregister a logger. Does nothing if the name is not registered.
    ///
    /// Handles to the logger stay usable.
    pub fn erase_logger(&self, name: &str) {
        self.loggers().remove(name);
    }

    /// Unregister every logger.
    pub fn erase_all_logger(&self) {
        self.loggers().clear();
    }

    /// The level given to loggers created from now on.
    pub fn level(&self) -> Level {
        Level::from_u8(self.level.load(Ordering::Relaxed)).unwrap_or(Level::Trace)
    }

    /// Set the level given to loggers created from now on.
    pub fn set_level(&self, level: Level) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    /// Unregister every logger and restore the default level.
    pub fn reset(&self) {
        self.erase_all_logger();
        self.set_level(Level::Trace);
    }
}

fn already_exists(name: &str) -> Error {
    Error::new(
        ErrorKind::AlreadyExists,
        format!("logger with name '{name}' already exists"),
    )
}
