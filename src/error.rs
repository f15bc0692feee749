//! Error types for logkv
//!
//! Provides a unified error type for file, index and storage operations.

use thiserror::Error;

/// Result type alias using LogKvError
pub type Result<T> = std::result::Result<T, LogKvError>;

/// Unified error type for logkv operations
#[derive(Debug, Error)]
pub enum LogKvError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Short write at offset {offset}: wrote {written} of {expected} bytes")]
    ShortWrite {
        offset: u64,
        expected: usize,
        written: usize,
    },

    #[error("Seek out of range: position {position} is before the start of the file")]
    SeekOutOfRange { position: i128 },

    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("Key not found: {}", .key.escape_ascii())]
    KeyNotFound { key: Vec<u8> },

    // -------------------------------------------------------------------------
    // Log Format Errors
    // -------------------------------------------------------------------------
    #[error("Malformed record at offset {offset}: {reason}")]
    MalformedRecord { offset: u64, reason: String },

    #[error("No valid record found at offset {offset}")]
    InvalidOffset { offset: u64 },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LogKvError {
    pub(crate) fn key_not_found(key: &[u8]) -> Self {
        LogKvError::KeyNotFound { key: key.to_vec() }
    }

    pub(crate) fn malformed(offset: u64, reason: impl Into<String>) -> Self {
        LogKvError::MalformedRecord {
            offset,
            reason: reason.into(),
        }
    }

    /// True for `KeyNotFound`, the only error a well-formed log produces
    /// for a missing or deleted key.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LogKvError::KeyNotFound { .. })
    }
}
