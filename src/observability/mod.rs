//! Observability subsystem for lodedb
//!
//! Per OBSERVABILITY.md, this module provides structured JSON logging.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on execution
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use lodedb::observability::Logger;
//!
//! Logger::info("RESTORE_COMPLETE", &[("records", "42".to_string())]);
//! ```

mod logger;

pub use logger::{Level, Logger};
