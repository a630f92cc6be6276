//! Record batching with terminal-flag signaling
//!
//! Per RESTORE.md §4:
//! - Records accumulate until the batch threshold, then flush as a
//!   non-terminal batch
//! - `finish` produces the session's single terminal batch, which may
//!   be empty
//! - A batch never exceeds the threshold, and order is preserved
//!
//! The accumulator hands its pending buffer to the emitted batch and
//! starts a fresh one, so records are moved, never cloned.

use std::mem;

use crate::store::StoreEntry;

/// Default number of records per batch (RESTORE.md §4).
pub const DEFAULT_BATCH_THRESHOLD: usize = 1000;

/// An ordered group of records plus the terminal flag.
///
/// Exactly one terminal batch is sent per session; it marks the write
/// session's last send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordBatch {
    records: Vec<StoreEntry>,
    terminal: bool,
}

impl RecordBatch {
    /// Creates a full batch with more to follow.
    pub fn non_terminal(records: Vec<StoreEntry>) -> Self {
        Self {
            records,
            terminal: false,
        }
    }

    /// Creates the session's final batch.
    pub fn terminal(records: Vec<StoreEntry>) -> Self {
        Self {
            records,
            terminal: true,
        }
    }

    /// Returns the records in arrival order.
    pub fn records(&self) -> &[StoreEntry] {
        &self.records
    }

    /// Consumes the batch, yielding its records.
    pub fn into_records(self) -> Vec<StoreEntry> {
        self.records
    }

    /// Returns the number of records in the batch.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns whether the batch holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns whether this is the session's final batch.
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }
}

/// Accumulates records and emits threshold-sized batches.
pub struct BatchAccumulator {
    threshold: usize,
    pending: Vec<StoreEntry>,
}

impl BatchAccumulator {
    /// Creates an accumulator with the given batch threshold.
    /// A threshold of zero is treated as one.
    pub fn new(threshold: usize) -> Self {
        let threshold = threshold.max(1);
        Self {
            threshold,
            pending: Vec::with_capacity(threshold),
        }
    }

    /// Adds a record, emitting a non-terminal batch when the threshold
    /// is reached.
    pub fn push(&mut self, entry: StoreEntry) -> Option<RecordBatch> {
        self.pending.push(entry);
        if self.pending.len() >= self.threshold {
            let full = mem::replace(&mut self.pending, Vec::with_capacity(self.threshold));
            return Some(RecordBatch::non_terminal(full));
        }
        None
    }

    /// Consumes the accumulator, yielding the terminal batch with
    /// whatever remains pending. The terminal batch may be empty.
    pub fn finish(self) -> RecordBatch {
        RecordBatch::terminal(self.pending)
    }

    /// Returns the number of records awaiting emission.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Returns whether no records are pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
