//! Index Module
//!
//! In-memory directory from key to the offset of its latest record.
//!
//! ## Responsibilities
//! - Existence check, insert/overwrite, lookup and delete by key
//! - Hold at most one offset per key
//!
//! Nothing here is persisted. A new index is always empty; rebuilding it
//! from the log is the caller's job (see `AppendOnlyLog::replay`).
//!
//! ## Implementations
//! - [`HashIndex`]: `HashMap`, the default
//! - [`OrderedIndex`]: `BTreeMap`, same contract

mod hash;
mod ordered;

use crate::error::Result;

pub use hash::HashIndex;
pub use ordered::OrderedIndex;

/// Capability set every index implementation provides
pub trait Index {
    /// True iff `key` currently has a recorded offset
    fn has(&self, key: &[u8]) -> bool;

    /// Insert or overwrite the offset for `key`
    fn set(&mut self, key: &[u8], offset: u64);

    /// Offset for `key`, or `KeyNotFound`
    fn get(&self, key: &[u8]) -> Result<u64>;

    /// Remove `key`, or `KeyNotFound` if it was absent
    fn delete(&mut self, key: &[u8]) -> Result<()>;

    /// Number of keys with a recorded offset
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry
    fn clear(&mut self);
}
