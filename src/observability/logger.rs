//! Structured JSON logger for lodedb
//!
//! Per OBSERVABILITY.md:
//! - Structured logs (JSON)
//! - Deterministic key ordering
//! - One log line = one event
//! - Synchronous, no buffering
//! - INFO/WARN to stdout, ERROR/FATAL to stderr

use std::fmt;
use std::io::{self, Write};

/// Log levels per OBSERVABILITY.md
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Normal operations
    Info,
    /// Recoverable issues
    Warn,
    /// Operation failures
    Error,
    /// Unrecoverable, process exits
    Fatal,
}

impl Level {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A structured logger that outputs one JSON line per event
///
/// Per OBSERVABILITY.md:
/// - Logs are synchronous
/// - No buffering
/// - `event` first, then `level`, then fields sorted by key
pub struct Logger;

impl Logger {
    /// Log at INFO level
    pub fn info(event: &str, fields: &[(&str, String)]) {
        Self::emit(Level::Info, event, fields, &mut io::stdout());
    }

    /// Log at WARN level
    pub fn warn(event: &str, fields: &[(&str, String)]) {
        Self::emit(Level::Warn, event, fields, &mut io::stdout());
    }

    /// Log at ERROR level
    pub fn error(event: &str, fields: &[(&str, String)]) {
        Self::emit(Level::Error, event, fields, &mut io::stderr());
    }

    /// Log at FATAL level
    pub fn fatal(event: &str, fields: &[(&str, String)]) {
        Self::emit(Level::Fatal, event, fields, &mut io::stderr());
    }

    /// Builds the JSON line and writes it with a single call
    fn emit<W: Write>(level: Level, event: &str, fields: &[(&str, String)], writer: &mut W) {
        let mut line = String::with_capacity(128);
        line.push('{');

        // Event first, then level
        Self::push_pair(&mut line, "event", event);
        line.push(',');
        Self::push_pair(&mut line, "level", level.as_str());

        // Sort fields alphabetically for deterministic output
        let mut ordered: Vec<&(&str, String)> = fields.iter().collect();
        ordered.sort_by_key(|(key, _)| *key);

        for (key, value) in ordered {
            line.push(',');
            Self::push_pair(&mut line, key, value);
        }

        line.push('}');
        line.push('\n');

        let _ = writer.write_all(line.as_bytes());
        let _ = writer.flush();
    }

    /// Appends `"key":"value"` with JSON escaping
    fn push_pair(line: &mut String, key: &str, value: &str) {
        line.push_str(&serde_json::Value::from(key).to_string());
        line.push(':');
        line.push_str(&serde_json::Value::from(value).to_string());
    }
}

/// Capture a log line to a string for testing
#[cfg(test)]
pub fn capture(level: Level, event: &str, fields: &[(&str, String)]) -> String {
    let mut buffer = Vec::new();
    Logger::emit(level, event, fields, &mut buffer);
    String::from_utf8(buffer).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_display() {
        assert_eq!(Level::Info.as_str(), "INFO");
        assert_eq!(Level::Warn.as_str(), "WARN");
        assert_eq!(Level::Error.as_str(), "ERROR");
        assert_eq!(Level::Fatal.as_str(), "FATAL");
    }

    #[test]
    fn test_log_json_format() {
        let output = capture(Level::Info, "RESTORE_START", &[]);

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["event"], "RESTORE_START");
        assert_eq!(parsed["level"], "INFO");
    }

    #[test]
    fn test_log_with_fields() {
        let output = capture(
            Level::Info,
            "RESTORE_PROGRESS",
            &[("records", "100000".to_string())],
        );

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["records"], "100000");
    }

    #[test]
    fn test_log_deterministic_ordering() {
        let output1 = capture(
            Level::Info,
            "TEST",
            &[
                ("zebra", "1".to_string()),
                ("apple", "2".to_string()),
                ("mango", "3".to_string()),
            ],
        );
        let output2 = capture(
            Level::Info,
            "TEST",
            &[
                ("apple", "2".to_string()),
                ("mango", "3".to_string()),
                ("zebra", "1".to_string()),
            ],
        );

        assert_eq!(output1, output2);

        let apple_pos = output1.find("apple").unwrap();
        let mango_pos = output1.find("mango").unwrap();
        let zebra_pos = output1.find("zebra").unwrap();
        assert!(apple_pos < mango_pos);
        assert!(mango_pos < zebra_pos);
    }

    #[test]
    fn test_log_escapes_special_chars() {
        let output = capture(
            Level::Error,
            "TEST",
            &[("message", "path \"a\\b\"\nline2".to_string())],
        );

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["message"], "path \"a\\b\"\nline2");
    }

    #[test]
    fn test_log_one_line() {
        let output = capture(
            Level::Info,
            "TEST",
            &[("a", "1".to_string()), ("b", "2".to_string())],
        );

        assert_eq!(output.chars().filter(|c| *c == '\n').count(), 1);
        assert!(output.ends_with('\n'));
    }

    #[test]
    fn test_log_event_first() {
        let output = capture(Level::Info, "MY_EVENT", &[]);

        let event_pos = output.find("\"event\"").unwrap();
        let level_pos = output.find("\"level\"").unwrap();
        assert!(event_pos < level_pos);
    }
}
