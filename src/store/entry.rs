//! Key-value entry encoding
//!
//! Per STORAGE.md §5.1, the entry format is:
//!
//! ```text
//! +------------------+
//! | Key Length       | (u32 LE)
//! +------------------+
//! | Key              | (key_length bytes)
//! +------------------+
//! | Value Length     | (u32 LE)
//! +------------------+
//! | Value            | (value_length bytes)
//! +------------------+
//! | Meta             | (u8, engine flag byte)
//! +------------------+
//! | Version          | (u64 LE)
//! +------------------+
//! | Checksum         | (u32 LE)
//! +------------------+
//! ```
//!
//! Checksum covers all bytes except the checksum itself. This is the
//! payload format carried inside each backup frame (RESTORE.md §2) and
//! the on-disk format of the entry log.

use std::io;

use super::checksum::compute_checksum;

/// Minimum encoded entry size: both length prefixes, meta, version,
/// and checksum, with empty key and value.
pub const MIN_ENTRY_SIZE: usize = 4 + 4 + 1 + 8 + 4;

/// One key-value entry in the store.
///
/// The `meta` byte is an opaque engine flag byte (tombstones, value
/// pointers) and is carried through restore untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEntry {
    /// Entry key
    pub key: Vec<u8>,
    /// Entry value (may be empty)
    pub value: Vec<u8>,
    /// Engine flag byte
    pub meta: u8,
    /// Entry version (monotonic per key)
    pub version: u64,
}

impl StoreEntry {
    /// Create an entry with meta 0 and version 0.
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            meta: 0,
            version: 0,
        }
    }

    /// Create an entry at a specific version.
    pub fn versioned(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>, version: u64) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            meta: 0,
            version,
        }
    }

    /// Returns the encoded size of this entry in bytes.
    pub fn encoded_len(&self) -> usize {
        MIN_ENTRY_SIZE + self.key.len() + self.value.len()
    }

    /// Encode the entry to its on-disk byte form.
    ///
    /// The checksum trailer covers every preceding byte.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());

        buf.extend_from_slice(&(self.key.len() as u32).to_le_bytes());
        buf.extend_from_slice(&self.key);
        buf.extend_from_slice(&(self.value.len() as u32).to_le_bytes());
        buf.extend_from_slice(&self.value);
        buf.push(self.meta);
        buf.extend_from_slice(&self.version.to_le_bytes());

        let checksum = compute_checksum(&buf);
        buf.extend_from_slice(&checksum.to_le_bytes());

        buf
    }

    /// Decode exactly one entry from `data`, verifying the checksum.
    ///
    /// The slice must contain the entry and nothing else; trailing bytes
    /// are rejected. This is the frame-payload decode path (RESTORE.md §2).
    pub fn decode(data: &[u8]) -> io::Result<Self> {
        let (entry, consumed) = Self::parse_at(data, 0)?;

        if consumed != data.len() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Trailing bytes after entry: entry is {} bytes, input is {}",
                    consumed,
                    data.len()
                ),
            ));
        }

        Ok(entry)
    }

    /// Decode a contiguous sequence of entries, in order.
    ///
    /// Used to walk an entry log produced by a write session.
    pub fn decode_all(data: &[u8]) -> io::Result<Vec<Self>> {
        let mut entries = Vec::new();
        let mut offset = 0;

        while offset < data.len() {
            let (entry, consumed) = Self::parse_at(data, offset)?;
            offset += consumed;
            entries.push(entry);
        }

        Ok(entries)
    }

    /// Parse one entry starting at `offset`, verifying its checksum.
    ///
    /// Returns the entry and the number of bytes consumed.
    fn parse_at(data: &[u8], offset: usize) -> io::Result<(Self, usize)> {
        let slice = &data[offset..];

        if slice.len() < MIN_ENTRY_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "Entry too short: {} bytes, minimum entry size is {}",
                    slice.len(),
                    MIN_ENTRY_SIZE
                ),
            ));
        }

        let mut pos = 0usize;

        let key_len = read_u32(slice, pos) as usize;
        pos += 4;
        if key_len > slice.len() - pos {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("Key length {} exceeds remaining {} bytes", key_len, slice.len() - pos),
            ));
        }
        let key = slice[pos..pos + key_len].to_vec();
        pos += key_len;

        if slice.len() - pos < 4 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Entry truncated before value length",
            ));
        }
        let value_len = read_u32(slice, pos) as usize;
        pos += 4;
        if value_len > slice.len() - pos {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "Value length {} exceeds remaining {} bytes",
                    value_len,
                    slice.len() - pos
                ),
            ));
        }
        let value = slice[pos..pos + value_len].to_vec();
        pos += value_len;

        // meta + version + checksum
        if slice.len() - pos < 1 + 8 + 4 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Entry truncated before meta, version, or checksum",
            ));
        }
        let meta = slice[pos];
        pos += 1;

        let mut version_buf = [0u8; 8];
        version_buf.copy_from_slice(&slice[pos..pos + 8]);
        let version = u64::from_le_bytes(version_buf);
        pos += 8;

        let stored_checksum = read_u32(slice, pos);
        let computed_checksum = compute_checksum(&slice[..pos]);
        pos += 4;

        if computed_checksum != stored_checksum {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Checksum mismatch: computed {:08x}, stored {:08x}",
                    computed_checksum, stored_checksum
                ),
            ));
        }

        Ok((
            Self {
                key,
                value,
                meta,
                version,
            },
            pos,
        ))
    }
}

fn read_u32(slice: &[u8], pos: usize) -> u32 {
    u32::from_le_bytes([slice[pos], slice[pos + 1], slice[pos + 2], slice[pos + 3]])
}
