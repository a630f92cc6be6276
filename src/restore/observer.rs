//! Restore progress observation
//!
//! Per RESTORE.md §6, the pipeline reports progress every
//! `PROGRESS_INTERVAL` records and once on completion. Reporting is
//! behind a trait so the pipeline never writes to stdout directly and
//! tests can record callbacks instead.

use std::time::Duration;

use crate::observability::Logger;

/// Records between progress callbacks (RESTORE.md §6).
pub const PROGRESS_INTERVAL: u64 = 100_000;

/// Receives progress callbacks from a running restore.
pub trait RestoreObserver {
    /// Called at every `PROGRESS_INTERVAL` records.
    fn on_progress(&mut self, records: u64);

    /// Called once, after the final flush succeeds.
    fn on_complete(&mut self, records: u64, elapsed: Duration);
}

/// Observer that emits structured log events.
pub struct LogObserver;

impl RestoreObserver for LogObserver {
    fn on_progress(&mut self, records: u64) {
        Logger::info("RESTORE_PROGRESS", &[("records", records.to_string())]);
    }

    fn on_complete(&mut self, records: u64, elapsed: Duration) {
        Logger::info(
            "RESTORE_COMPLETE",
            &[
                ("elapsed_ms", elapsed.as_millis().to_string()),
                ("records", records.to_string()),
            ],
        );
    }
}

/// Observer that discards all callbacks.
pub struct NullObserver;

impl RestoreObserver for NullObserver {
    fn on_progress(&mut self, _records: u64) {}

    fn on_complete(&mut self, _records: u64, _elapsed: Duration) {}
}
