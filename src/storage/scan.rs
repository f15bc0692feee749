//! Log scanner
//!
//! Walks every record from offset 0 to end of file.

use crate::error::Result;
use crate::file::LogFile;

use super::Record;

/// A record together with the offset it starts at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub offset: u64,
    pub record: Record,
}

/// Sequential iterator over a log file
///
/// Yields records in append order. Iteration ends at a clean end of file,
/// or right after the first error (a malformed record is reported once).
pub struct LogScanner<'a, F: LogFile + ?Sized> {
    file: &'a mut F,
    position: u64,
    done: bool,
}

impl<'a, F: LogFile + ?Sized> LogScanner<'a, F> {
    /// Scan `file` from the beginning
    pub fn new(file: &'a mut F) -> Self {
        Self {
            file,
            position: 0,
            done: false,
        }
    }

    /// Offset of the next record to be read
    pub fn position(&self) -> u64 {
        self.position
    }
}

impl<F: LogFile + ?Sized> Iterator for LogScanner<'_, F> {
    type Item = Result<LogEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match Record::read_at(&mut *self.file, self.position) {
            Ok(Some(record)) => {
                let offset = self.position;
                self.position += record.encoded_len() as u64;
                Some(Ok(LogEntry { offset, record }))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
