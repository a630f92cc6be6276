//! Backup source resolution
//!
//! A backup location is a plain filesystem path or a `file://` URI
//! (RESTORE.md §2). Other schemes, `s3://` included, are rejected at
//! open time rather than failing mid-stream.

use std::fs::File;
use std::io::{BufReader, Read};

use super::errors::{RestoreError, RestoreResult};

/// Read buffer size for backup streams.
pub const SOURCE_BUFFER_SIZE: usize = 16 * 1024;

/// A buffered byte stream over a backup file.
#[derive(Debug)]
pub struct BackupSource {
    location: String,
    reader: BufReader<File>,
}

impl BackupSource {
    /// Opens the backup at the given location.
    ///
    /// # Errors
    ///
    /// Returns `LODE_RESTORE_SOURCE_OPEN_FAILED` if the location names
    /// an unsupported scheme or the file cannot be opened.
    pub fn open(location: &str) -> RestoreResult<Self> {
        let path = Self::resolve_path(location)?;

        let file = File::open(path).map_err(|e| {
            RestoreError::source_open(format!("Failed to open backup source: {}", path), e)
        })?;

        Ok(Self {
            location: location.to_string(),
            reader: BufReader::with_capacity(SOURCE_BUFFER_SIZE, file),
        })
    }

    /// Returns the location string the source was opened with.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Maps a location string to a filesystem path.
    fn resolve_path(location: &str) -> RestoreResult<&str> {
        if let Some(path) = location.strip_prefix("file://") {
            return Ok(path);
        }
        if let Some((scheme, _)) = location.split_once("://") {
            return Err(RestoreError::unsupported_scheme(scheme));
        }
        Ok(location)
    }
}

impl Read for BackupSource {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reader.read(buf)
    }
}
