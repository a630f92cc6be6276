//! CRC32 checksum computation for store entries
//!
//! Per STORAGE.md §5.2 and RESTORE.md §7:
//! - Every entry carries a checksum over its encoded fields
//! - Any checksum failure during restore aborts the restore
//!
//! Uses CRC32 (IEEE polynomial) for checksums.

use crc32fast::Hasher;

/// Computes a CRC32 checksum over the provided data.
///
/// This function is deterministic: the same input always produces the same output.
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Verifies that the computed checksum matches the expected checksum.
pub fn verify_checksum(data: &[u8], expected: u32) -> bool {
    compute_checksum(data) == expected
}
