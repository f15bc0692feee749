//! File Module
//!
//! Byte-oriented persistence substrate underneath the log.
//!
//! ## Responsibilities
//! - Append bytes at the end of the file
//! - Read from an explicit, seekable read cursor
//! - Keep the append position independent of the read cursor
//!
//! ## Cursor Model
//! ```text
//!   0                      tell()                    len()
//!   ├────────────────────────┼─────────────────────────┤
//!   │        record bytes    ▲ read cursor (seek/read) ▲ append position
//! ```
//! `seek` only moves the read cursor; `write` always lands at `len()`.
//! `truncate` is the only way bytes ever leave the file.

mod memory;
mod monolith;

use std::io::SeekFrom;

use crate::error::{LogKvError, Result};

pub use memory::MemoryFile;
pub use monolith::MonolithicFile;

/// How a file-backed log is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Read existing contents; every write fails
    ReadOnly,

    /// Keep existing contents and append after them
    Append,

    /// Discard existing contents on open
    Truncate,
}

/// How many bytes a `read` should return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadSize {
    /// At most this many bytes (fewer only at end of file)
    UpTo(usize),

    /// Everything from the cursor to end of file
    ToEnd,
}

impl From<usize> for ReadSize {
    fn from(size: usize) -> Self {
        ReadSize::UpTo(size)
    }
}

/// Capability set every log file implementation provides
pub trait LogFile {
    /// Append `data` at end of file, returning the number of bytes written
    fn write(&mut self, data: &[u8]) -> Result<usize>;

    /// Read from the read cursor and advance it
    fn read(&mut self, size: ReadSize) -> Result<Vec<u8>>;

    /// Move the read cursor, returning its new absolute position
    fn seek(&mut self, pos: SeekFrom) -> Result<u64>;

    /// Current read cursor position
    fn tell(&self) -> u64;

    /// End of file: the offset the next `write` starts at
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cut the file back to `len` bytes
    ///
    /// Never extends the file; a `len` at or past end of file is a no-op.
    /// Used to discard the remains of a failed append.
    fn truncate(&mut self, len: u64) -> Result<()>;

    /// Push written bytes down to durable storage
    fn sync(&mut self) -> Result<()>;
}

/// Turn a `SeekFrom` into an absolute position.
///
/// Positions past end of file are allowed; positions before byte 0 are not.
pub(crate) fn resolve_seek(pos: SeekFrom, current: u64, end: u64) -> Result<u64> {
    let target: i128 = match pos {
        SeekFrom::Start(n) => n as i128,
        SeekFrom::Current(delta) => current as i128 + delta as i128,
        SeekFrom::End(delta) => end as i128 + delta as i128,
    };

    u64::try_from(target).map_err(|_| LogKvError::SeekOutOfRange { position: target })
}
