//! # logkv
//!
//! A single-file key-value storage engine with:
//! - An append-only log of immutable key/value records
//! - Tombstone records for deletes
//! - An in-memory index from key to the offset of its newest record
//! - Pluggable file and index implementations (traits)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 StorageEngine (AppendOnlyLog)                │
//! │             set / get / delete, scan / replay                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   LogFile   │          │    Index    │
//!   │  (append +  │          │ key → offset│
//!   │ random read)│          │  (in RAM)   │
//!   └─────────────┘          └─────────────┘
//! ```
//!
//! The index is never persisted. A freshly opened engine has an empty
//! index until the caller runs [`AppendOnlyLog::replay`].

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod file;
pub mod index;
pub mod storage;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{LogKvError, Result};
pub use config::Config;
pub use file::{LogFile, MemoryFile, MonolithicFile, OpenMode, ReadSize};
pub use index::{HashIndex, Index, OrderedIndex};
pub use storage::{AppendOnlyLog, Record, RecordKind, StorageEngine};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of logkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
