//! Storage engine: entry log and managed write sessions
//!
//! Layout per STORAGE.md §5-§6:
//! - `StoreEntry`: key, value, meta byte, version, CRC32 trailer
//! - Entry log at `<store_dir>/data/entries.dat`, append-only
//! - `WriteSession`: batched writes with an explicit durability point
//!
//! # Design
//!
//! - Every entry is checksummed on encode and verified on decode
//! - Appends are buffered per batch and written with a single write
//! - Durability is explicit: `flush` fsyncs the log and its directory

mod checksum;
mod entry;
mod errors;
mod session;

pub use checksum::{compute_checksum, verify_checksum};
pub use entry::{StoreEntry, MIN_ENTRY_SIZE};
pub use errors::{Severity, StoreError, StoreErrorCode, StoreResult};
pub use session::{SessionOptions, StoreWriteSession, WriteSession};
