//! Length-prefixed frame decoding
//!
//! Backup streams are a sequence of frames (RESTORE.md §2):
//! - 8-byte little-endian u64 length prefix
//! - payload of exactly that many bytes, one encoded record
//!
//! `FrameReader` pulls frames one at a time. Clean end of stream is
//! the reader returning zero bytes at a prefix boundary; anywhere else,
//! running dry is an error. The declared length is never trusted for
//! allocation: the payload buffer grows only as bytes actually arrive.

use std::io::{ErrorKind, Read};

use super::errors::{RestoreError, RestoreResult};
use crate::store::StoreEntry;

/// Streaming decoder for length-prefixed backup frames.
///
/// The payload buffer is reused across frames; steady-state reading
/// does not allocate per frame.
pub struct FrameReader<R: Read> {
    reader: R,
    /// Reused payload buffer
    payload: Vec<u8>,
    /// Frames decoded so far
    frames_read: u64,
    /// Bytes consumed so far, prefixes included
    bytes_read: u64,
}

impl<R: Read> FrameReader<R> {
    /// Creates a frame reader over the given stream.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            payload: Vec::new(),
            frames_read: 0,
            bytes_read: 0,
        }
    }

    /// Returns the number of frames decoded so far.
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /// Returns the number of bytes consumed so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Reads the next record from the stream.
    ///
    /// Returns `Ok(None)` at clean end of stream: zero bytes available
    /// at a frame boundary.
    ///
    /// # Errors
    ///
    /// - `LODE_RESTORE_FRAME_READ_FAILED` on I/O failure or a stream
    ///   that ends inside a length prefix
    /// - `LODE_RESTORE_TRUNCATED_FRAME` when the payload comes up short
    ///   of its declared length
    /// - `LODE_RESTORE_RECORD_DECODE_FAILED` when the payload is not a
    ///   valid record
    pub fn read_next(&mut self) -> RestoreResult<Option<StoreEntry>> {
        let declared = match self.read_length()? {
            Some(len) => len,
            None => return Ok(None),
        };
        self.bytes_read += 8;

        self.payload.clear();
        let received = self
            .reader
            .by_ref()
            .take(declared)
            .read_to_end(&mut self.payload)
            .map_err(|e| RestoreError::frame_read("Failed to read frame payload", e))?;
        self.bytes_read += received as u64;

        if (received as u64) < declared {
            return Err(RestoreError::truncated_frame(declared, received as u64));
        }

        let entry = StoreEntry::decode(&self.payload)
            .map_err(|e| RestoreError::decode_failed(self.frames_read, e.to_string()))?;

        self.frames_read += 1;
        Ok(Some(entry))
    }

    /// Reads an 8-byte length prefix.
    ///
    /// Returns `Ok(None)` if the stream is already exhausted. A stream
    /// that yields some prefix bytes but not all 8 is an error.
    fn read_length(&mut self) -> RestoreResult<Option<u64>> {
        let mut prefix = [0u8; 8];
        let mut filled = 0;

        while filled < prefix.len() {
            match self.reader.read(&mut prefix[filled..]) {
                Ok(0) => {
                    if filled == 0 {
                        return Ok(None);
                    }
                    return Err(RestoreError::partial_length_prefix(filled));
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(RestoreError::frame_read(
                        "Failed to read frame length prefix",
                        e,
                    ))
                }
            }
        }

        Ok(Some(u64::from_le_bytes(prefix)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::restore::errors::RestoreErrorCode;
    use std::io::Cursor;

    fn frame(payload: &[u8]) -> Vec<u8> {
        let mut out = (payload.len() as u64).to_le_bytes().to_vec();
        out.extend_from_slice(payload);
        out
    }

    fn entry_frame(entry: &StoreEntry) -> Vec<u8> {
        frame(&entry.encode())
    }

    #[test]
    fn test_empty_stream_is_clean_end() {
        let mut reader = FrameReader::new(Cursor::new(Vec::new()));

        assert!(reader.read_next().unwrap().is_none());
        assert_eq!(reader.frames_read(), 0);
        assert_eq!(reader.bytes_read(), 0);
    }

    #[test]
    fn test_single_frame_roundtrip() {
        let entry = StoreEntry::versioned(b"user:1".to_vec(), b"alice".to_vec(), 7);
        let mut reader = FrameReader::new(Cursor::new(entry_frame(&entry)));

        assert_eq!(reader.read_next().unwrap(), Some(entry));
        assert!(reader.read_next().unwrap().is_none());
        assert_eq!(reader.frames_read(), 1);
    }

    #[test]
    fn test_multiple_frames_in_order() {
        let entries: Vec<StoreEntry> = (0..5)
            .map(|i| {
                StoreEntry::versioned(
                    format!("key{}", i).into_bytes(),
                    format!("value{}", i).into_bytes(),
                    i,
                )
            })
            .collect();

        let mut stream = Vec::new();
        for entry in &entries {
            stream.extend_from_slice(&entry_frame(entry));
        }

        let mut reader = FrameReader::new(Cursor::new(stream));
        for expected in &entries {
            assert_eq!(reader.read_next().unwrap().as_ref(), Some(expected));
        }
        assert!(reader.read_next().unwrap().is_none());
        assert_eq!(reader.frames_read(), 5);
    }

    #[test]
    fn test_partial_length_prefix_is_error() {
        // 3 bytes where an 8-byte prefix should start.
        let mut reader = FrameReader::new(Cursor::new(vec![1u8, 2, 3]));

        let err = reader.read_next().unwrap_err();
        assert_eq!(err.code(), RestoreErrorCode::LodeRestoreFrameReadFailed);
        assert!(err.message().contains("got 3 of 8 bytes"));
    }

    #[test]
    fn test_truncated_payload_reports_both_counts() {
        // Declare 500 bytes, provide 200.
        let mut stream = 500u64.to_le_bytes().to_vec();
        stream.extend_from_slice(&[0xAB; 200]);

        let mut reader = FrameReader::new(Cursor::new(stream));
        let err = reader.read_next().unwrap_err();

        assert_eq!(err.code(), RestoreErrorCode::LodeRestoreTruncatedFrame);
        assert!(err.message().contains("expected 500 bytes"));
        assert!(err.message().contains("got 200"));
    }

    #[test]
    fn test_corrupt_payload_is_decode_error() {
        let entry = StoreEntry::new(b"key".to_vec(), b"value".to_vec());
        let mut payload = entry.encode();
        let last = payload.len() - 1;
        payload[last] ^= 0xFF;

        let mut reader = FrameReader::new(Cursor::new(frame(&payload)));
        let err = reader.read_next().unwrap_err();

        assert_eq!(err.code(), RestoreErrorCode::LodeRestoreRecordDecodeFailed);
        assert!(err.message().contains("frame 0"));
    }

    #[test]
    fn test_decode_error_leaves_frame_count() {
        let good = StoreEntry::new(b"a".to_vec(), b"1".to_vec());
        let mut bad_payload = StoreEntry::new(b"b".to_vec(), b"2".to_vec()).encode();
        bad_payload[0] ^= 0xFF;

        let mut stream = entry_frame(&good);
        stream.extend_from_slice(&frame(&bad_payload));

        let mut reader = FrameReader::new(Cursor::new(stream));
        assert!(reader.read_next().unwrap().is_some());

        let err = reader.read_next().unwrap_err();
        assert!(err.message().contains("frame 1"));
        assert_eq!(reader.frames_read(), 1);
    }

    #[test]
    fn test_byte_counter_includes_prefixes() {
        let entry = StoreEntry::new(b"key".to_vec(), b"value".to_vec());
        let encoded_len = entry.encoded_len() as u64;

        let mut reader = FrameReader::new(Cursor::new(entry_frame(&entry)));
        reader.read_next().unwrap();

        assert_eq!(reader.bytes_read(), 8 + encoded_len);
    }

    #[test]
    fn test_payload_buffer_reused_across_frames() {
        let big = StoreEntry::new(b"big".to_vec(), vec![0x42; 4096]);
        let small = StoreEntry::new(b"small".to_vec(), b"x".to_vec());

        let mut stream = entry_frame(&big);
        stream.extend_from_slice(&entry_frame(&small));

        let mut reader = FrameReader::new(Cursor::new(stream));
        assert_eq!(reader.read_next().unwrap(), Some(big));

        let capacity_after_big = reader.payload.capacity();
        assert_eq!(reader.read_next().unwrap(), Some(small));
        assert_eq!(reader.payload.capacity(), capacity_after_big);
    }

    #[test]
    fn test_zero_length_frame_is_decode_error() {
        // An empty payload cannot hold a record.
        let mut reader = FrameReader::new(Cursor::new(frame(&[])));
        let err = reader.read_next().unwrap_err();

        assert_eq!(err.code(), RestoreErrorCode::LodeRestoreRecordDecodeFailed);
    }
}
