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

use std::fs;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use crate::Error;
use crate::ErrorKind;
use crate::Layout;
use crate::Trap;
use crate::encoding;
use crate::encoding::Charset;
use crate::record::Level;
use crate::record::Record;
use crate::sink::Sink;
use crate::sink::SinkOptions;

/// Default rotation threshold, 10 MiB.
pub const DEFAULT_MAX_SIZE: u64 = 10 * 1024 * 1024;

/// How an existing log file is treated when the sink opens it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Keep existing content and write after it.
    #[default]
    Append,
    /// Discard existing content.
    Truncate,
}

/// A builder to configure and create a [`File`] sink.
#[derive(Debug)]
pub struct FileBuilder {
    path: PathBuf,
    max_size: u64,
    mode: OpenMode,
    charset: Charset,
    options: SinkOptions,
}

impl FileBuilder {
    /// Create a new file sink builder writing in the charset of the process locale.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_size: DEFAULT_MAX_SIZE,
            mode: OpenMode::default(),
            charset: Charset::system(),
            options: SinkOptions::default(),
        }
    }

    /// Create a new file sink builder writing UTF-8.
    pub fn utf8(path: impl Into<PathBuf>) -> Self {
        FileBuilder::new(path).charset(Charset::utf8())
    }

    /// Build the [`File`] sink.
    ///
    /// This never fails: if the file cannot be opened, the error goes to the trap and the
    /// returned sink is closed.
    pub fn build(self) -> File {
        let FileBuilder {
            path,
            max_size,
            mode,
            charset,
            options,
        } = self;

        let (file, size) = match open(&path, mode) {
            Ok((file, size)) => (Some(file), size),
            Err(err) => {
                options.trap().trap(&err);
                (None, 0)
            }
        };

        File {
            backup: backup_path(&path),
            path,
            max_size,
            charset,
            open: AtomicBool::new(file.is_some()),
            state: Mutex::new(FileState { file, size }),
            options,
        }
    }

    /// Set the rotation threshold in bytes.
    ///
    /// Default to 10 MiB. `0` and `u64::MAX` disable rotation.
    pub fn max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set the open mode. Default to [`OpenMode::Append`].
    pub fn mode(mut self, mode: OpenMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the charset the file is written in.
    pub fn charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    /// Set the layout for the logs.
    ///
    /// Default to [`TextLayout`](crate::layout::TextLayout).
    ///
    /// # Examples
    ///
    /// ```
    /// use logsink::layout::PageLayout;
    /// use logsink::sink::FileBuilder;
    ///
    /// let builder = FileBuilder::utf8("logs/app.log");
    /// builder.layout(PageLayout::default());
    /// ```
    pub fn layout(mut self, layout: impl Into<Box<dyn Layout>>) -> Self {
        self.options = self.options.with_layout(layout);
        self
    }

    /// Set the minimum level. Default to [`Level::Trace`].
    pub fn level(self, level: Level) -> Self {
        self.options.set_level(level);
        self
    }

    /// Render call-site locations. Default to `false`.
    pub fn verbose(self, verbose: bool) -> Self {
        self.options.set_verbose(verbose);
        self
    }

    /// Set the trap for handling errors during logging.
    ///
    /// Default to [`SilentTrap`](crate::trap::SilentTrap).
    ///
    /// # Examples
    ///
    /// ```
    /// use logsink::sink::FileBuilder;
    /// use logsink::trap::DefaultTrap;
    ///
    /// let builder = FileBuilder::utf8("logs/app.log");
    /// builder.trap(DefaultTrap::default());
    /// ```
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.options = self.options.with_trap(trap);
        self
    }
}

#[derive(Debug)]
struct FileState {
    file: Option<fs::File>,
    size: u64,
}

/// A sink that writes log records to a file, moving it to `<path>.bak` when it grows too large.
#[derive(Debug)]
pub struct File {
    path: PathBuf,
    backup: PathBuf,
    max_size: u64,
    charset: Charset,
    open: AtomicBool,
    state: Mutex<FileState>,
    options: SinkOptions,
}

impl File {
    /// The path of the live log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The path rotated content is moved to.
    pub fn backup_path(&self) -> &Path {
        &self.backup
    }

    /// The charset records are written in.
    pub fn charset(&self) -> Charset {
        self.charset
    }

    /// The number of bytes in the live log file.
    pub fn size(&self) -> u64 {
        self.state().size
    }

    fn state(&self) -> MutexGuard<'_, FileState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn should_rotate(&self, size: u64, pending: u64) -> bool {
        if self.max_size == 0 || self.max_size == u64::MAX {
            return false;
        }
        size > 0 && size.saturating_add(pending) >= self.max_size
    }

    fn write_bytes(&self, bytes: &[u8], backup_failure: &mut Option<Error>) -> Result<(), Error> {
        let pending = bytes.len() as u64;
        let mut state = self.state();
        if self.should_rotate(state.size, pending) {
            self.rotate(&mut state, backup_failure)?;
        }

        let Some(file) = state.file.as_mut() else {
            return Ok(());
        };
        file.write_all(bytes)
            .and_then(|()| file.flush())
            .map_err(|err| Error::from_io_error(err).with_context("path", self.path.display()))?;
        state.size += pending;
        Ok(())
    }

    /// Move the live file to the backup path and reopen it empty.
    ///
    /// A failed move is stored in `backup_failure` so the caller can report it once the state
    /// lock is released; writing then continues on the truncated live file.
    fn rotate(
        &self,
        state: &mut FileState,
        backup_failure: &mut Option<Error>,
    ) -> Result<(), Error> {
        drop(state.file.take());
        *backup_failure = replace_backup(&self.path, &self.backup).err();

        match open(&self.path, OpenMode::Truncate) {
            Ok((file, _)) => {
                state.file = Some(file);
                state.size = 0;
                Ok(())
            }
            Err(err) => {
                state.size = 0;
                self.open.store(false, Ordering::Release);
                Err(err)
            }
        }
    }
}

impl Sink for File {
    fn options(&self) -> &SinkOptions {
        &self.options
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    fn write(&self, _: &Record, text: String) -> Result<(), Error> {
        let bytes = if self.charset.is_utf8() {
            text.into_bytes()
        } else {
            encoding::utf8_to_narrow(&text, self.charset)?
        };

        let mut backup_failure = None;
        let result = self.write_bytes(&bytes, &mut backup_failure);
        if let Some(err) = backup_failure {
            self.options.trap().trap(&err);
        }
        result
    }

    fn flush(&self) -> Result<(), Error> {
        let mut state = self.state();
        if let Some(file) = state.file.as_mut() {
            file.flush().map_err(Error::from_io_error)?;
        }
        Ok(())
    }
}

impl Drop for File {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(|e| e.into_inner());
        if let Some(file) = state.file.as_mut() {
            let _ = file.flush();
        }
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let mut backup = path.as_os_str().to_owned();
    backup.push(".bak");
    PathBuf::from(backup)
}

fn open(path: &Path, mode: OpenMode) -> Result<(fs::File, u64), Error> {
    let wrap = |err: io::Error, message: &'static str| {
        Error::new(ErrorKind::Io, message)
            .with_context("path", path.display())
            .with_source(err)
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|err| wrap(err, "failed to create log directory"))?;
        }
    }

    let mut options = fs::OpenOptions::new();
    match mode {
        OpenMode::Append => options.create(true).append(true),
        OpenMode::Truncate => options.create(true).write(true).truncate(true),
    };
    let file = options
        .open(path)
        .map_err(|err| wrap(err, "failed to open log file"))?;
    let size = file
        .metadata()
        .map_err(|err| wrap(err, "failed to read log file metadata"))?
        .len();
    Ok((file, size))
}

fn replace_backup(path: &Path, backup: &Path) -> Result<(), Error> {
    let wrap = |err: io::Error| {
        Error::new(ErrorKind::Io, "failed to move log file to backup")
            .with_context("path", path.display())
            .with_context("backup", backup.display())
            .with_source(err)
    };

    match fs::remove_file(backup) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(wrap(err)),
    }
    fs::rename(path, backup).map_err(wrap)
}
