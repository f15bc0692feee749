//! Monolithic file
//!
//! The whole log lives in one disk file: `{directory}/{tablespace}.dblog`.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::config::{validate_tablespace, LOG_EXTENSION};
use crate::error::{LogKvError, Result};

use super::{resolve_seek, LogFile, OpenMode, ReadSize};

/// Single-file log backed by one OS file descriptor
///
/// The descriptor's own cursor is scratch space: every read seeks to
/// `read_pos` first and every write seeks to `end` first, so the logical
/// read and append positions never disturb each other.
///
/// The descriptor is closed when the value is dropped.
#[derive(Debug)]
pub struct MonolithicFile {
    /// Location of the log file
    path: PathBuf,
    /// Mode the file was opened with
    mode: OpenMode,
    /// OS handle
    file: File,
    /// Logical read cursor
    read_pos: u64,
    /// End of file (next append offset)
    end: u64,
}

impl MonolithicFile {
    /// Open `{directory}/{tablespace}.dblog`
    ///
    /// The directory must already exist. The file itself is created when
    /// missing, in every mode.
    pub fn open(directory: impl AsRef<Path>, tablespace: &str, mode: OpenMode) -> Result<Self> {
        validate_tablespace(tablespace)?;

        let directory = directory.as_ref();
        if !directory.exists() {
            return Err(LogKvError::Config(format!(
                "Directory does not exist: {}",
                directory.display()
            )));
        }
        if !directory.is_dir() {
            return Err(LogKvError::Config(format!(
                "Path exists but is not a directory: {}",
                directory.display()
            )));
        }

        let path = directory.join(format!("{}.{}", tablespace.trim(), LOG_EXTENSION));
        Self::open_path(path, mode)
    }

    /// Open a log file at an explicit path
    pub fn open_path(path: impl Into<PathBuf>, mode: OpenMode) -> Result<Self> {
        let path = path.into();

        let file = match mode {
            OpenMode::ReadOnly => {
                if !path.exists() {
                    OpenOptions::new().create(true).append(true).open(&path)?;
                }
                OpenOptions::new().read(true).open(&path)?
            }
            OpenMode::Append => OpenOptions::new()
                .read(true)
                .append(true)
                .create(true)
                .open(&path)?,
            OpenMode::Truncate => OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(true)
                .open(&path)?,
        };

        let end = file.metadata()?.len();

        tracing::debug!("Opened log file {} ({:?}, {} bytes)", path.display(), mode, end);

        Ok(Self {
            path,
            mode,
            file,
            read_pos: 0,
            end,
        })
    }

    /// Path of the underlying file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Mode the file was opened with
    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    /// Sync and release the descriptor, surfacing any sync error
    pub fn close(mut self) -> Result<()> {
        self.sync()
    }
}

impl LogFile for MonolithicFile {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        self.file.seek(SeekFrom::Start(self.end))?;

        if let Err(e) = self.file.write_all(data) {
            // Part of `data` may have landed; take the real length from disk
            self.end = match self.file.metadata() {
                Ok(meta) => meta.len(),
                Err(meta_err) => {
                    // Assume the worst so a later truncate still cuts it
                    tracing::warn!(
                        "Could not read length of {} after failed write: {}",
                        self.path.display(),
                        meta_err
                    );
                    self.end + data.len() as u64
                }
            };
            return Err(e.into());
        }

        self.end += data.len() as u64;
        Ok(data.len())
    }

    fn read(&mut self, size: ReadSize) -> Result<Vec<u8>> {
        self.file.seek(SeekFrom::Start(self.read_pos))?;

        let mut buf = Vec::new();
        match size {
            ReadSize::UpTo(n) => {
                buf.reserve(n.min(self.end.saturating_sub(self.read_pos) as usize));
                Read::by_ref(&mut self.file).take(n as u64).read_to_end(&mut buf)?;
            }
            ReadSize::ToEnd => {
                self.file.read_to_end(&mut buf)?;
            }
        }

        self.read_pos += buf.len() as u64;
        Ok(buf)
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        self.read_pos = resolve_seek(pos, self.read_pos, self.end)?;
        Ok(self.read_pos)
    }

    fn tell(&self) -> u64 {
        self.read_pos
    }

    fn len(&self) -> u64 {
        self.end
    }

    fn truncate(&mut self, len: u64) -> Result<()> {
        if len >= self.end {
            return Ok(());
        }

        self.file.set_len(len)?;
        self.end = len;

        tracing::debug!("Truncated {} to {} bytes", self.path.display(), len);
        Ok(())
    }

    fn sync(&mut self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }
}
