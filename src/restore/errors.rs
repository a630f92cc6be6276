//! Restore-specific error types
//!
//! Per ERRORS.md, restore errors follow the standard error model:
//! - Structured error codes in LODE_CATEGORY_NAME format
//! - No silent failures
//!
//! Every restore error is FATAL (RESTORE.md §7): the pipeline stops at
//! the first failure and reports it unchanged. There is no retry and
//! no partial-progress recovery. Counts that matter for diagnosis
//! (expected vs received bytes, the failing frame's ordinal) are
//! folded into the message.

use std::fmt;
use std::io;

/// Error severity. Restore knows only one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Unrecoverable error requiring operator intervention
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Restore error codes per ERRORS.md format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreErrorCode {
    /// Backup source could not be opened, or its scheme is unsupported
    LodeRestoreSourceOpenFailed,
    /// Store write session could not be opened
    LodeRestoreStoreOpenFailed,
    /// I/O failure while reading from the stream
    LodeRestoreFrameReadFailed,
    /// Frame payload shorter than its declared length
    LodeRestoreTruncatedFrame,
    /// Frame payload is not a valid record
    LodeRestoreRecordDecodeFailed,
    /// Write session rejected a batch
    LodeRestoreBatchWriteFailed,
    /// Final durability flush failed
    LodeRestoreFlushFailed,
}

impl RestoreErrorCode {
    /// Returns the string representation per ERRORS.md format
    pub fn as_str(&self) -> &'static str {
        match self {
            RestoreErrorCode::LodeRestoreSourceOpenFailed => "LODE_RESTORE_SOURCE_OPEN_FAILED",
            RestoreErrorCode::LodeRestoreStoreOpenFailed => "LODE_RESTORE_STORE_OPEN_FAILED",
            RestoreErrorCode::LodeRestoreFrameReadFailed => "LODE_RESTORE_FRAME_READ_FAILED",
            RestoreErrorCode::LodeRestoreTruncatedFrame => "LODE_RESTORE_TRUNCATED_FRAME",
            RestoreErrorCode::LodeRestoreRecordDecodeFailed => "LODE_RESTORE_RECORD_DECODE_FAILED",
            RestoreErrorCode::LodeRestoreBatchWriteFailed => "LODE_RESTORE_BATCH_WRITE_FAILED",
            RestoreErrorCode::LodeRestoreFlushFailed => "LODE_RESTORE_FLUSH_FAILED",
        }
    }

    /// Returns the severity level for this error code
    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }
}

impl fmt::Display for RestoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Restore error with full context
#[derive(Debug)]
pub struct RestoreError {
    /// Error code following LODE_CATEGORY_NAME format
    code: RestoreErrorCode,
    /// Human-readable error message
    message: String,
    /// Optional underlying IO error
    source: Option<io::Error>,
}

impl RestoreError {
    fn new(code: RestoreErrorCode, message: impl Into<String>, source: Option<io::Error>) -> Self {
        Self {
            code,
            message: message.into(),
            source,
        }
    }

    /// Creates a source-open error with the underlying I/O failure
    pub fn source_open(message: impl Into<String>, source: io::Error) -> Self {
        Self::new(
            RestoreErrorCode::LodeRestoreSourceOpenFailed,
            message,
            Some(source),
        )
    }

    /// Creates a source-open error for a location scheme the loader
    /// does not speak
    pub fn unsupported_scheme(scheme: &str) -> Self {
        Self::new(
            RestoreErrorCode::LodeRestoreSourceOpenFailed,
            format!("Unsupported backup location scheme: {}", scheme),
            None,
        )
    }

    /// Creates a store-open error
    pub fn store_open(message: impl Into<String>) -> Self {
        Self::new(RestoreErrorCode::LodeRestoreStoreOpenFailed, message, None)
    }

    /// Creates a frame-read error with the underlying I/O failure
    pub fn frame_read(message: impl Into<String>, source: io::Error) -> Self {
        Self::new(
            RestoreErrorCode::LodeRestoreFrameReadFailed,
            message,
            Some(source),
        )
    }

    /// Creates a frame-read error for a stream that ended partway
    /// through an 8-byte length prefix
    pub fn partial_length_prefix(got: usize) -> Self {
        Self::new(
            RestoreErrorCode::LodeRestoreFrameReadFailed,
            format!(
                "Stream ended inside a frame length prefix: got {} of 8 bytes",
                got
            ),
            None,
        )
    }

    /// Creates a truncated-frame error carrying both byte counts
    pub fn truncated_frame(expected: u64, actual: u64) -> Self {
        Self::new(
            RestoreErrorCode::LodeRestoreTruncatedFrame,
            format!(
                "Frame payload truncated: expected {} bytes, got {}",
                expected, actual
            ),
            None,
        )
    }

    /// Creates a record-decode error naming the failing frame
    pub fn decode_failed(frame: u64, reason: impl Into<String>) -> Self {
        Self::new(
            RestoreErrorCode::LodeRestoreRecordDecodeFailed,
            format!("Invalid record in frame {}: {}", frame, reason.into()),
            None,
        )
    }

    /// Creates a batch-write error
    pub fn batch_write(message: impl Into<String>) -> Self {
        Self::new(RestoreErrorCode::LodeRestoreBatchWriteFailed, message, None)
    }

    /// Creates a flush error
    pub fn flush_failed(message: impl Into<String>) -> Self {
        Self::new(RestoreErrorCode::LodeRestoreFlushFailed, message, None)
    }

    /// Returns the error code
    pub fn code(&self) -> RestoreErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the severity of this error
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns whether this error aborts the restore. Always true.
    pub fn is_fatal(&self) -> bool {
        true
    }
}

impl fmt::Display for RestoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code,
            self.message
        )?;
        if let Some(ref source) = self.source {
            write!(f, " (caused by: {})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for RestoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for restore operations
pub type RestoreResult<T> = Result<T, RestoreError>;
