//! Restore subsystem for lodedb
//!
//! Restore streams a backup into a store through a managed write
//! session.
//!
//! Per RESTORE.md:
//! - Single pass over the stream
//! - Bounded memory: one frame and one partial batch at a time
//! - Every record verified before it enters a batch
//! - Exactly one terminal batch per session
//! - Explicit failure
//!
//! # Algorithm (RESTORE.md §3)
//!
//! 1. Open the backup source
//! 2. Open the store write session
//! 3. Decode frames, accumulate batches, send full batches
//! 4. Send the terminal batch
//! 5. Flush durably
//! 6. Report the summary
//!
//! # Important
//!
//! Restore writes blind.
//! Restore does NOT retry failed operations.
//! Restore does NOT roll back partial progress.
//! Restore does NOT merge with existing values.
//! A failed restore leaves a durable-unknown prefix of the stream in
//! the store.

mod batch;
mod errors;
mod frame;
mod observer;
mod source;

pub use batch::{BatchAccumulator, RecordBatch, DEFAULT_BATCH_THRESHOLD};
pub use errors::{RestoreError, RestoreErrorCode, RestoreResult, Severity};
pub use frame::FrameReader;
pub use observer::{LogObserver, NullObserver, RestoreObserver, PROGRESS_INTERVAL};
pub use source::{BackupSource, SOURCE_BUFFER_SIZE};

use std::io::Read;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::store::{SessionOptions, StoreWriteSession, WriteSession};

/// Options for a restore run.
#[derive(Debug, Clone)]
pub struct RestoreOptions {
    /// Backup location: a filesystem path or `file://` URI
    pub source: String,
    /// Store directory the entry log lives under
    pub store_dir: PathBuf,
    /// Records per batch
    pub batch_threshold: usize,
}

impl RestoreOptions {
    /// Creates options with the default batch threshold.
    pub fn new(source: impl Into<String>, store_dir: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            store_dir: store_dir.into(),
            batch_threshold: DEFAULT_BATCH_THRESHOLD,
        }
    }

    /// Overrides the batch threshold.
    pub fn with_batch_threshold(mut self, threshold: usize) -> Self {
        self.batch_threshold = threshold;
        self
    }
}

/// Outcome of a successful restore.
#[derive(Debug, Clone, Copy)]
pub struct RestoreSummary {
    /// Records restored
    pub records: u64,
    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

/// Restore manager driving a backup stream into a store.
///
/// # Usage
///
/// ```ignore
/// let options = RestoreOptions::new("./backup.bin", "./store");
/// let summary = RestoreManager::restore(&options, &mut LogObserver)?;
/// ```
pub struct RestoreManager;

impl RestoreManager {
    /// Restores a backup into the store named by `options`.
    ///
    /// Per RESTORE.md §3, this follows the exact sequence:
    /// 1. Open the backup source
    /// 2. Open the store write session in restore mode
    /// 3. Decode frames, accumulate batches, send full batches
    /// 4. Send the terminal batch
    /// 5. Flush durably
    /// 6. Report the summary
    ///
    /// # Errors
    ///
    /// Returns `RestoreError` on any failure:
    /// - `LODE_RESTORE_SOURCE_OPEN_FAILED`: source missing or scheme
    ///   unsupported
    /// - `LODE_RESTORE_STORE_OPEN_FAILED`: store directory unusable
    /// - any error `load` reports
    ///
    /// All errors are FATAL. A failed run may leave a prefix of the
    /// stream in the store.
    ///
    /// # Forbidden Operations
    ///
    /// This function does NOT:
    /// - Retry failed reads or writes
    /// - Roll back records already sent
    /// - Read or merge existing store state
    /// - Spawn threads
    pub fn restore<O: RestoreObserver>(
        options: &RestoreOptions,
        observer: &mut O,
    ) -> RestoreResult<RestoreSummary> {
        // Step 1: Open the backup source
        let source = BackupSource::open(&options.source)?;

        // Step 2: Open the store write session in restore mode
        let mut session = StoreWriteSession::open(&options.store_dir, SessionOptions::restore())
            .map_err(|e| {
                RestoreError::store_open(format!("Failed to open store write session: {}", e))
            })?;

        // Steps 3-6: Drain the stream into the session
        Self::load(source, &mut session, options.batch_threshold, observer)
    }

    /// Drains a backup stream into an already-open write session.
    ///
    /// Covers steps 3-6 of the restore sequence. Progress is reported
    /// every `PROGRESS_INTERVAL` records; `on_complete` fires once,
    /// after the final flush succeeds.
    ///
    /// # Errors
    ///
    /// - `LODE_RESTORE_FRAME_READ_FAILED`, `LODE_RESTORE_TRUNCATED_FRAME`,
    ///   `LODE_RESTORE_RECORD_DECODE_FAILED`: malformed or short stream
    /// - `LODE_RESTORE_BATCH_WRITE_FAILED`: session rejected a batch
    /// - `LODE_RESTORE_FLUSH_FAILED`: final flush failed
    pub fn load<R, S, O>(
        reader: R,
        session: &mut S,
        batch_threshold: usize,
        observer: &mut O,
    ) -> RestoreResult<RestoreSummary>
    where
        R: Read,
        S: WriteSession,
        O: RestoreObserver,
    {
        let start = Instant::now();
        let mut frames = FrameReader::new(reader);
        let mut batcher = BatchAccumulator::new(batch_threshold);
        let mut count: u64 = 0;

        // Step 3: Decode frames, accumulate batches, send full batches
        while let Some(entry) = frames.read_next()? {
            count += 1;
            if count % PROGRESS_INTERVAL == 0 {
                observer.on_progress(count);
            }

            if let Some(batch) = batcher.push(entry) {
                session.send(batch).map_err(|e| {
                    RestoreError::batch_write(format!("Write session rejected batch: {}", e))
                })?;
            }
        }

        // Step 4: Send the terminal batch
        session.send(batcher.finish()).map_err(|e| {
            RestoreError::batch_write(format!("Write session rejected terminal batch: {}", e))
        })?;

        // Step 5: Flush durably
        session
            .flush()
            .map_err(|e| RestoreError::flush_failed(format!("Final flush failed: {}", e)))?;

        // Step 6: Report the summary
        let elapsed = start.elapsed();
        observer.on_complete(count, elapsed);

        Ok(RestoreSummary {
            records: count,
            elapsed,
        })
    }
}
