//! Hash index
//!
//! `HashMap`-based key → offset table.

use std::collections::HashMap;

use crate::error::{LogKvError, Result};

use super::Index;

/// Unordered in-memory index
#[derive(Debug, Default, Clone)]
pub struct HashIndex {
    offsets: HashMap<Vec<u8>, u64>,
}

impl HashIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty index with room for `capacity` keys
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            offsets: HashMap::with_capacity(capacity),
        }
    }
}

impl Index for HashIndex {
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
        self.offsets
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| LogKvError::key_not_found(key))
    }

    fn len(&self) -> usize {
        self.offsets.len()
    }

    fn clear(&mut self) {
        self.offsets.clear();
    }
}
