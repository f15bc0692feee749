//! Append-only log engine
//!
//! Composes a [`LogFile`] and an [`Index`] into a [`StorageEngine`].

use std::fs;

use crate::config::Config;
use crate::error::{LogKvError, Result};
use crate::file::{LogFile, MonolithicFile};
use crate::index::{HashIndex, Index};

use super::{LogScanner, Record, StorageEngine};

/// Counters produced by [`AppendOnlyLog::replay`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    /// Records scanned
    pub records: u64,
    /// Live value records scanned
    pub values: u64,
    /// Tombstones scanned
    pub tombstones: u64,
    /// Keys left in the index afterwards
    pub live_keys: usize,
}

/// Storage engine over an append-only record log
///
/// ## Write Path
/// 1. Encode the record
/// 2. Remember `file.len()` as the record's offset
/// 3. Append the whole record
/// 4. Only then touch the index
///
/// A failed or short append leaves the index exactly as it was, and the log
/// is cut back to the record's start offset so no partial record is left in
/// front of later appends. Failed appends are not retried.
///
/// ## Read Path
/// index lookup → seek → decode → tombstone/key check → value
pub struct AppendOnlyLog<F: LogFile, I: Index> {
    /// Record log (owned exclusively)
    file: F,

    /// key → offset of newest record (owned exclusively)
    index: I,

    /// fsync after each append
    sync_on_write: bool,
}

impl AppendOnlyLog<MonolithicFile, HashIndex> {
    /// Open the log described by `config`
    ///
    /// On startup:
    /// 1. Validate config and create the data directory
    /// 2. Open `{data_dir}/{tablespace}.dblog`
    /// 3. Start with an empty index
    /// 4. Replay the log only if `replay_on_open` is set
    pub fn open(config: &Config) -> Result<Self> {
        // Step 1: Validate and prepare the directory
        config.validate()?;
        fs::create_dir_all(&config.data_dir)?;

        // Step 2: Open the log file
        let file = MonolithicFile::open(&config.data_dir, &config.tablespace, config.open_mode)?;

        // Step 3: Fresh index
        let mut log = Self::new(file, HashIndex::new()).with_sync_on_write(config.sync_on_write);

        // Step 4: Optional caller-requested replay
        if config.replay_on_open {
            let stats = log.replay()?;
            tracing::debug!(
                "Replayed {}: {} records, {} live keys",
                config.log_path().display(),
                stats.records,
                stats.live_keys
            );
        }

        Ok(log)
    }
}

impl<F: LogFile, I: Index> AppendOnlyLog<F, I> {
    /// Compose an engine from a file and an index
    ///
    /// The index is used as given; existing log contents are not scanned.
    pub fn new(file: F, index: I) -> Self {
        Self {
            file,
            index,
            sync_on_write: false,
        }
    }

    /// fsync after every append
    pub fn with_sync_on_write(mut self, enabled: bool) -> Self {
        self.sync_on_write = enabled;
        self
    }

    // =========================================================================
    // Log Scanning
    // =========================================================================

    /// Iterate over every record in the log, oldest first
    pub fn scan(&mut self) -> LogScanner<'_, F> {
        LogScanner::new(&mut self.file)
    }

    /// Rebuild the index from a full scan of the log
    ///
    /// The index is cleared first. Live records point their key at their own
    /// offset; tombstones remove the key. Stops at the first malformed
    /// record, leaving the index with everything replayed up to that point.
    pub fn replay(&mut self) -> Result<ReplayStats> {
        self.index.clear();

        let mut stats = ReplayStats::default();

        for entry in LogScanner::new(&mut self.file) {
            let entry = entry?;
            stats.records += 1;

            if entry.record.is_tombstone() {
                stats.tombstones += 1;
                if self.index.has(entry.record.key()) {
                    self.index.delete(entry.record.key())?;
                }
            } else {
                stats.values += 1;
                self.index.set(entry.record.key(), entry.offset);
            }
        }

        stats.live_keys = self.index.len();
        Ok(stats)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Offset of the newest record for `key`
    pub fn offset_of(&self, key: &[u8]) -> Result<u64> {
        self.index.get(key)
    }

    /// True iff `key` is live in the index
    pub fn contains(&self, key: &[u8]) -> bool {
        self.index.has(key)
    }

    /// Number of live keys
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Size of the log in bytes
    pub fn log_len(&self) -> u64 {
        self.file.len()
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    pub fn file(&self) -> &F {
        &self.file
    }

    /// Force appended bytes to durable storage
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync()
    }

    /// Sync, then release the file and index
    pub fn close(mut self) -> Result<()> {
        self.file.sync()
    }

    /// Give back the file and index
    pub fn into_parts(self) -> (F, I) {
        (self.file, self.index)
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Append a complete record, returning its start offset
    fn append(&mut self, record: &Record) -> Result<u64> {
        let encoded = record.encode();
        let offset = self.file.len();

        let written = match self.file.write(&encoded) {
            Ok(written) => written,
            Err(e) => {
                self.rollback(offset);
                return Err(e);
            }
        };
        if written != encoded.len() {
            tracing::warn!(
                "Short write at offset {}: {} of {} bytes",
                offset,
                written,
                encoded.len()
            );
            self.rollback(offset);
            return Err(LogKvError::ShortWrite {
                offset,
                expected: encoded.len(),
                written,
            });
        }

        if self.sync_on_write {
            self.file.sync()?;
        }

        Ok(offset)
    }

    /// Cut the log back to `offset`, dropping any partial record after it
    ///
    /// The append's own error is what the caller sees, so a failed rollback
    /// is only logged.
    fn rollback(&mut self, offset: u64) {
        if let Err(e) = self.file.truncate(offset) {
            tracing::warn!("Could not roll log back to offset {}: {}", offset, e);
        }
    }

    /// Decode the record at `offset`; end of file there is an error
    fn load_record_at(&mut self, offset: u64) -> Result<Record> {
        Record::read_at(&mut self.file, offset)?.ok_or(LogKvError::InvalidOffset { offset })
    }
}

impl<F: LogFile, I: Index> StorageEngine for AppendOnlyLog<F, I> {
    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        let offset = self.append(&Record::value(key, value))?;
        self.index.set(key, offset);

        tracing::trace!("set {} at offset {}", key.escape_ascii(), offset);
        Ok(())
    }

    fn get(&mut self, key: &[u8]) -> Result<Vec<u8>> {
        if !self.index.has(key) {
            return Err(LogKvError::key_not_found(key));
        }
        let offset = self.index.get(key)?;

        let record = self.load_record_at(offset)?;

        if record.key() != key {
            // Index points at somebody else's record; drop the stale entry
            tracing::warn!(
                "Index entry for {} points at a record for {} (offset {})",
                key.escape_ascii(),
                record.key().escape_ascii(),
                offset
            );
            self.index.delete(key)?;
            return Err(LogKvError::InvalidOffset { offset });
        }

        if record.is_tombstone() {
            return Err(LogKvError::key_not_found(key));
        }

        tracing::trace!("get {} from offset {}", key.escape_ascii(), offset);
        Ok(record.into_value())
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        if !self.index.has(key) {
            return Err(LogKvError::key_not_found(key));
        }

        let offset = self.append(&Record::tombstone(key))?;
        self.index.delete(key)?;

        tracing::trace!("delete {} (tombstone at offset {})", key.escape_ascii(), offset);
        Ok(())
    }
}
