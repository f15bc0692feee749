//! Ordered index
//!
//! `BTreeMap`-based key → offset table. Keys are kept sorted, although the
//! engine never relies on that.

use std::collections::BTreeMap;

use crate::error::{LogKvError, Result};

use super::Index;

/// Sorted in-memory index
#[derive(Debug, Default, Clone)]
pub struct OrderedIndex {
    offsets: BTreeMap<Vec<u8>, u64>,
}

impl OrderedIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Smallest indexed key
    pub fn first_key(&self) -> Option<&[u8]> {
        self.offsets.keys().next().map(|k| k.as_slice())
    }

    /// Largest indexed key
    pub fn last_key(&self) -> Option<&[u8]> {
        self.offsets.keys().next_back().map(|k| k.as_slice())
    }
}

impl Index for OrderedIndex {
    fn has(&self, key: &[u8]) -> bool {
        self.offsets.contains_key(key)
    }

    fn set(&mut self, key: &[u8], offset: u64) {
        match self.offsets.get_mut(key) {
            Some(slot) => *slot = offset,
            None => {
                self.offsets.insert(key.to_vec(), offset);
            }
        }
    }

    fn get(&self, key: &[u8]) -> Result<u64> {
        self.offsets
            .get(key)
            .copied()
            .ok_or_else(|| LogKvError::key_not_found(key))
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        match self.offsets.remove(key) {
            Some(_) => Ok(()),
            None => Err(LogKvError::key_not_found(key)),
        }
    }

    fn len(&self) -> usize {
        self.offsets.len()
    }

    fn clear(&mut self) {
        self.offsets.clear();
    }
}
