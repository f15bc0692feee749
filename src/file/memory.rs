//! In-memory file
//!
//! `Vec<u8>`-backed log with the same cursor rules as the disk file.

use std::io::SeekFrom;

use crate::error::Result;

use super::{resolve_seek, LogFile, ReadSize};

/// Log file that never touches disk
#[derive(Debug, Default, Clone)]
pub struct MemoryFile {
    data: Vec<u8>,
    read_pos: u64,
}

impl MemoryFile {
    /// Create an empty in-memory file
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing bytes (read cursor at 0)
    pub fn with_data(data: Vec<u8>) -> Self {
        Self { data, read_pos: 0 }
    }

    /// Borrow the raw contents
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Take the raw contents
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

impl LogFile for MemoryFile {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        self.data.extend_from_slice(data);
        Ok(data.len())
    }

    fn read(&mut self, size: ReadSize) -> Result<Vec<u8>> {
        let len = self.data.len();
        let start = (self.read_pos as usize).min(len);
        let stop = match size {
            ReadSize::UpTo(n) => start.saturating_add(n).min(len),
            ReadSize::ToEnd => len,
        };

        let chunk = self.data[start..stop].to_vec();
        self.read_pos += chunk.len() as u64;
        Ok(chunk)
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        self.read_pos = resolve_seek(pos, self.read_pos, self.data.len() as u64)?;
        Ok(self.read_pos)
    }

    fn tell(&self) -> u64 {
        self.read_pos
    }

    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    fn truncate(&mut self, len: u64) -> Result<()> {
        if len < self.data.len() as u64 {
            self.data.truncate(len as usize);
        }
        Ok(())
    }

    fn sync(&mut self) -> Result<()> {
        Ok(())
    }
}
