//! Store error types following ERRORS.md
//!
//! Error codes:
//! - LODE_STORE_OPEN_FAILED (ERROR severity)
//! - LODE_STORE_WRITE_FAILED (ERROR severity)
//! - LODE_STORE_FLUSH_FAILED (FATAL severity)
//! - LODE_STORE_SESSION_SEALED (ERROR severity)

use std::fmt;
use std::io;

/// Severity levels for store errors as defined in ERRORS.md
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, caller decides how to continue
    Error,
    /// Durability can no longer be guaranteed
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Store-specific error codes as defined in ERRORS.md
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorCode {
    /// Store files could not be created or opened
    LodeStoreOpenFailed,
    /// Entry append failed
    LodeStoreWriteFailed,
    /// fsync of the entry log failed
    LodeStoreFlushFailed,
    /// Send after the terminal batch
    LodeStoreSessionSealed,
}

impl StoreErrorCode {
    /// Returns the string code as defined in ERRORS.md
    pub fn code(&self) -> &'static str {
        match self {
            StoreErrorCode::LodeStoreOpenFailed => "LODE_STORE_OPEN_FAILED",
            StoreErrorCode::LodeStoreWriteFailed => "LODE_STORE_WRITE_FAILED",
            StoreErrorCode::LodeStoreFlushFailed => "LODE_STORE_FLUSH_FAILED",
            StoreErrorCode::LodeStoreSessionSealed => "LODE_STORE_SESSION_SEALED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            StoreErrorCode::LodeStoreOpenFailed => Severity::Error,
            StoreErrorCode::LodeStoreWriteFailed => Severity::Error,
            StoreErrorCode::LodeStoreFlushFailed => Severity::Fatal,
            StoreErrorCode::LodeStoreSessionSealed => Severity::Error,
        }
    }

    /// Returns the invariant violated by this error, if applicable
    pub fn invariant(&self) -> Option<&'static str> {
        match self {
            StoreErrorCode::LodeStoreOpenFailed => None,
            StoreErrorCode::LodeStoreWriteFailed => Some("D1"),
            StoreErrorCode::LodeStoreFlushFailed => Some("D1"),
            StoreErrorCode::LodeStoreSessionSealed => Some("R2"),
        }
    }
}

impl fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Store error type with full context as required by ERRORS.md
#[derive(Debug)]
pub struct StoreError {
    /// Error code
    code: StoreErrorCode,
    /// Human-readable message
    message: String,
    /// Optional details about the error context
    details: Option<String>,
    /// Underlying IO error if applicable
    source: Option<io::Error>,
}

impl StoreError {
    /// Create a new store open failed error
    pub fn open_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StoreErrorCode::LodeStoreOpenFailed,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Create a new store write failed error
    pub fn write_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StoreErrorCode::LodeStoreWriteFailed,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Create a store write failed error without IO source
    pub fn write_failed_no_source(message: impl Into<String>) -> Self {
        Self {
            code: StoreErrorCode::LodeStoreWriteFailed,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Create a new flush failed error (FATAL)
    pub fn flush_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StoreErrorCode::LodeStoreFlushFailed,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Create a session sealed error with the records already written
    pub fn session_sealed(records_written: u64) -> Self {
        Self {
            code: StoreErrorCode::LodeStoreSessionSealed,
            message: "Write session already received its terminal batch".to_string(),
            details: Some(format!("records_written: {}", records_written)),
            source: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> StoreErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the invariant violated, if applicable
    pub fn invariant(&self) -> Option<&'static str> {
        self.code.invariant()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns additional error details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Returns whether this error is fatal (durability can no longer be guaranteed)
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        if let Some(ref invariant) = self.code.invariant() {
            write!(f, " [violates {}]", invariant)?;
        }
        Ok(())
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
