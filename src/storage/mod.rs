//! Storage Module
//!
//! Key-value engine on top of an append-only record log.
//!
//! ## Responsibilities
//! - Encode/decode log records
//! - Append every `set`/`delete` at the end of the log
//! - Keep the index pointing at each key's newest record
//! - Caller-driven scanning and index replay
//!
//! ## Record Format
//! ```text
//! ┌──────────┬──────────────┬─────────┬────────────────┬───────────┐
//! │ Flag (1) │ KeyLen (8)   │   Key   │ ValueLen (8)   │   Value   │
//! └──────────┴──────────────┴─────────┴────────────────┴───────────┘
//!   0 = value, 1 = tombstone (ValueLen = 0); integers little-endian
//! ```
//!
//! ## Log Layout
//! ```text
//! offset 0            offset 27          offset 52
//! ├─ set hello=world ──┼─ set hello=all ──┼─ del hello ─┤
//!                      ▲
//!                      index["hello"] (before the delete)
//! ```

mod engine;
mod record;
mod scan;

use crate::error::Result;

pub use engine::{AppendOnlyLog, ReplayStats};
pub use record::{Record, RecordKind, FLAG_SIZE, LEN_SIZE, RECORD_OVERHEAD};
pub use scan::{LogEntry, LogScanner};

/// Public key-value contract
///
/// Reads take `&mut self` because they move the file's read cursor.
pub trait StorageEngine {
    /// Store `value` under `key`, superseding any previous value
    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Latest value for `key`; `KeyNotFound` if absent or deleted
    fn get(&mut self, key: &[u8]) -> Result<Vec<u8>>;

    /// Delete `key`; `KeyNotFound` if it is not present
    fn delete(&mut self, key: &[u8]) -> Result<()>;
}
