//! Log record codec
//!
//! Writes records with `BytesMut` and reads them back from a `LogFile`
//! at an explicit offset.

use std::io::SeekFrom;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{LogKvError, Result};
use crate::file::{LogFile, ReadSize};

/// Size of the tombstone flag
pub const FLAG_SIZE: usize = 1;

/// Size of each length field (u64)
pub const LEN_SIZE: usize = 8;

/// Fixed bytes per record: flag + key length + value length = 17
pub const RECORD_OVERHEAD: usize = FLAG_SIZE + 2 * LEN_SIZE;

/// Value of the leading flag byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RecordKind {
    /// Live key/value pair
    Value = 0,
    /// Deletion marker (empty value)
    Tombstone = 1,
}

impl RecordKind {
    /// Convert from the on-disk flag byte
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(RecordKind::Value),
            1 => Some(RecordKind::Tombstone),
            _ => None,
        }
    }
}

/// One immutable entry of the log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    kind: RecordKind,
    key: Vec<u8>,
    value: Vec<u8>,
}

impl Record {
    /// A live key/value record
    pub fn value(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            kind: RecordKind::Value,
            key: key.into(),
            value: value.into(),
        }
    }

    /// A deletion record for `key`
    pub fn tombstone(key: impl Into<Vec<u8>>) -> Self {
        Self {
            kind: RecordKind::Tombstone,
            key: key.into(),
            value: Vec::new(),
        }
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn is_tombstone(&self) -> bool {
        self.kind == RecordKind::Tombstone
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn value_bytes(&self) -> &[u8] {
        &self.value
    }

    pub fn into_value(self) -> Vec<u8> {
        self.value
    }

    /// Exact number of bytes `encode` produces
    pub fn encoded_len(&self) -> usize {
        RECORD_OVERHEAD + self.key.len() + self.value.len()
    }

    /// Serialize: [flag][key_len][key][value_len][value]
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_len());

        buf.put_u8(self.kind as u8);
        buf.put_u64_le(self.key.len() as u64);
        buf.put_slice(&self.key);
        buf.put_u64_le(self.value.len() as u64);
        buf.put_slice(&self.value);

        buf.freeze()
    }

    /// Decode the record starting at `offset`
    ///
    /// Returns:
    /// - `Ok(Some(record))`: a complete record
    /// - `Ok(None)`: `offset` is exactly end of file
    /// - `Err(InvalidOffset)`: `offset` lies past end of file
    /// - `Err(MalformedRecord)`: header or lengths don't fit the file
    ///
    /// Length fields are checked against the file size before anything is
    /// allocated, so a corrupt length can't trigger a huge read.
    pub fn read_at<F: LogFile + ?Sized>(file: &mut F, offset: u64) -> Result<Option<Self>> {
        let end = file.len();
        if offset == end {
            return Ok(None);
        }
        if offset > end {
            return Err(LogKvError::InvalidOffset { offset });
        }

        file.seek(SeekFrom::Start(offset))?;

        // Flag + key length
        let head = file.read(ReadSize::UpTo(FLAG_SIZE + LEN_SIZE))?;
        if head.len() < FLAG_SIZE + LEN_SIZE {
            return Err(LogKvError::malformed(offset, "truncated record header"));
        }
        let mut head = &head[..];
        let flag = head.get_u8();
        let key_len = head.get_u64_le();

        let kind = RecordKind::from_u8(flag).ok_or_else(|| {
            LogKvError::malformed(offset, format!("invalid record flag {:#04x}", flag))
        })?;

        let mut remaining = end - offset - (FLAG_SIZE + LEN_SIZE) as u64;
        let key_section = key_len
            .checked_add(LEN_SIZE as u64)
            .filter(|&n| n <= remaining)
            .ok_or_else(|| {
                LogKvError::malformed(
                    offset,
                    format!("key length {} exceeds the {} bytes left in the log", key_len, remaining),
                )
            })?;

        // Key + value length
        let body = file.read(ReadSize::UpTo(key_section as usize))?;
        if body.len() as u64 != key_section {
            return Err(LogKvError::malformed(offset, "truncated record key"));
        }
        let key = body[..key_len as usize].to_vec();
        let value_len = (&body[key_len as usize..]).get_u64_le();
        remaining -= key_section;

        if value_len > remaining {
            return Err(LogKvError::malformed(
                offset,
                format!("value length {} exceeds the {} bytes left in the log", value_len, remaining),
            ));
        }
        if kind == RecordKind::Tombstone && value_len != 0 {
            return Err(LogKvError::malformed(
                offset,
                format!("tombstone carries a {} byte value", value_len),
            ));
        }

        let value = file.read(ReadSize::UpTo(value_len as usize))?;
        if value.len() as u64 != value_len {
            return Err(LogKvError::malformed(offset, "truncated record value"));
        }

        Ok(Some(Self { kind, key, value }))
    }
}
