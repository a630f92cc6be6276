//! Managed write session over the entry log
//!
//! Per RESTORE.md §5:
//! - Writes are blind: no reads, no merging with existing values
//! - Per-send durability is disabled in restore mode; durability comes
//!   from the explicit final flush
//! - The terminal batch seals the session; later sends are rejected
//! - An empty batch is valid and carries only its terminal flag
//!
//! The entry log is append-only (STORAGE.md §6.1). Each batch is
//! concatenated into one contiguous buffer and appended with a single
//! write.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::errors::{StoreError, StoreResult};
use crate::restore::RecordBatch;

/// Batched write interface into the storage engine.
///
/// `send` applies the batch's records in order; a terminal batch is the
/// last send the session will accept. `flush` makes every sent batch
/// durable.
pub trait WriteSession {
    /// Apply a batch of records in order.
    fn send(&mut self, batch: RecordBatch) -> StoreResult<()>;

    /// Durably persist all batches sent so far.
    fn flush(&mut self) -> StoreResult<()>;
}

/// Options controlling write session durability.
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    /// Whether every send is followed by fsync.
    /// When false, durability is deferred to the final flush.
    pub sync_on_send: bool,
}

impl SessionOptions {
    /// Restore-mode options: per-send sync disabled, durability via the
    /// final flush (RESTORE.md §5).
    pub fn restore() -> Self {
        Self {
            sync_on_send: false,
        }
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self { sync_on_send: true }
    }
}

/// File-backed write session appending to `<store_dir>/data/entries.dat`.
///
/// The file handle is released when the session is dropped, on success
/// and failure paths alike.
pub struct StoreWriteSession {
    /// Path to the entry log
    log_path: PathBuf,
    /// Underlying file handle
    file: File,
    /// Whether every send is fsynced
    sync_on_send: bool,
    /// Records appended so far
    records_written: u64,
    /// Bytes appended so far
    bytes_written: u64,
    /// Set once the terminal batch arrives
    sealed: bool,
}

impl StoreWriteSession {
    /// Opens or creates the entry log under the store directory.
    ///
    /// Creates `<store_dir>/data/entries.dat` and any missing parent
    /// directories.
    ///
    /// # Errors
    ///
    /// Returns `LODE_STORE_OPEN_FAILED` if the directories or the file
    /// cannot be created or opened.
    pub fn open(store_dir: &Path, options: SessionOptions) -> StoreResult<Self> {
        let data_dir = store_dir.join("data");
        let log_path = data_dir.join("entries.dat");

        if !data_dir.exists() {
            fs::create_dir_all(&data_dir).map_err(|e| {
                StoreError::open_failed(
                    format!("Failed to create data directory: {}", data_dir.display()),
                    e,
                )
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .map_err(|e| {
                StoreError::open_failed(
                    format!("Failed to open entry log: {}", log_path.display()),
                    e,
                )
            })?;

        Ok(Self {
            log_path,
            file,
            sync_on_send: options.sync_on_send,
            records_written: 0,
            bytes_written: 0,
            sealed: false,
        })
    }

    /// Returns the path to the entry log.
    pub fn path(&self) -> &Path {
        &self.log_path
    }

    /// Returns the number of records appended in this session.
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Returns the number of bytes appended in this session.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Returns whether the terminal batch has been received.
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// fsync the directory containing the entry log so the file's
    /// existence survives a crash.
    fn sync_log_dir(&self) -> StoreResult<()> {
        let dir = match self.log_path.parent() {
            Some(dir) => dir,
            None => return Ok(()),
        };

        let handle = File::open(dir).map_err(|e| {
            StoreError::flush_failed(
                format!("Failed to open directory for fsync: {}", dir.display()),
                e,
            )
        })?;

        handle.sync_all().map_err(|e| {
            StoreError::flush_failed(
                format!("Directory fsync failed: {}", dir.display()),
                e,
            )
        })
    }
}

impl WriteSession for StoreWriteSession {
    /// Appends the batch's records to the entry log in order.
    ///
    /// Per RESTORE.md §5:
    /// - One contiguous write per batch
    /// - Empty batches are accepted (terminal-only sends)
    /// - The terminal batch seals the session exactly once
    ///
    /// # Errors
    ///
    /// - `LODE_STORE_SESSION_SEALED` on a send after the terminal batch
    /// - `LODE_STORE_WRITE_FAILED` if the append fails
    /// - `LODE_STORE_FLUSH_FAILED` if a per-send fsync fails
    fn send(&mut self, batch: RecordBatch) -> StoreResult<()> {
        if self.sealed {
            return Err(StoreError::session_sealed(self.records_written));
        }

        if !batch.is_empty() {
            let mut buf = Vec::new();
            for entry in batch.records() {
                buf.extend_from_slice(&entry.encode());
            }

            self.file.write_all(&buf).map_err(|e| {
                StoreError::write_failed(
                    format!("Failed to append batch of {} entries", batch.len()),
                    e,
                )
            })?;

            if self.sync_on_send {
                self.file.sync_all().map_err(|e| {
                    StoreError::flush_failed("fsync failed after batch append", e)
                })?;
            }

            self.records_written += batch.len() as u64;
            self.bytes_written += buf.len() as u64;
        }

        if batch.is_terminal() {
            self.sealed = true;
        }

        Ok(())
    }

    /// fsyncs the entry log and its directory.
    ///
    /// # Errors
    ///
    /// Returns `LODE_STORE_FLUSH_FAILED` (FATAL) if either fsync fails.
    fn flush(&mut self) -> StoreResult<()> {
        self.file.sync_all().map_err(|e| {
            StoreError::flush_failed(
                format!("fsync of entry log failed: {}", self.log_path.display()),
                e,
            )
        })?;

        self.sync_log_dir()
    }
}
