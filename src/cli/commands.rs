//! CLI command implementations
//!
//! Per CLI.md, commands are thin drivers: they load configuration,
//! call into the restore pipeline, and report one JSON result on
//! stdout. All policy lives in the pipeline.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::observability::Logger;
use crate::restore::{
    BackupSource, FrameReader, LogObserver, RestoreManager, RestoreOptions,
    DEFAULT_BATCH_THRESHOLD,
};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response};

/// Configuration file structure per CONFIG.md
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backup location: a path or file:// URI (required)
    pub source: String,

    /// Store directory the entry log lives under (required)
    pub store_dir: String,

    /// Records per batch (optional, default 1000)
    #[serde(default = "default_batch_threshold")]
    pub batch_threshold: usize,
}

fn default_batch_threshold() -> usize {
    DEFAULT_BATCH_THRESHOLD
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration per CONFIG.md
    fn validate(&self) -> CliResult<()> {
        if self.source.is_empty() {
            return Err(CliError::config_error("source must not be empty"));
        }

        if self.store_dir.is_empty() {
            return Err(CliError::config_error("store_dir must not be empty"));
        }

        if self.batch_threshold == 0 {
            return Err(CliError::config_error("batch_threshold must be > 0"));
        }

        Ok(())
    }

    /// Get store directory as Path
    pub fn store_path(&self) -> &Path {
        Path::new(&self.store_dir)
    }

    /// Convert to restore pipeline options
    pub fn to_options(&self) -> RestoreOptions {
        RestoreOptions::new(self.source.as_str(), self.store_dir.as_str())
            .with_batch_threshold(self.batch_threshold)
    }
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Restore { config } => restore(&config),
        Command::Inspect { source } => inspect(&source),
    }
}

/// Restore a store from a backup stream
///
/// Per RESTORE.md §3:
/// 1. Load and validate configuration
/// 2. Run the restore pipeline with log-based progress
/// 3. Report the summary as one JSON object on stdout
///
/// On failure, the pipeline's error is written as an error envelope
/// and the process exits non-zero.
pub fn restore(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;

    Logger::info(
        "RESTORE_START",
        &[
            ("source", config.source.clone()),
            ("store_dir", config.store_dir.clone()),
        ],
    );

    let options = config.to_options();
    match RestoreManager::restore(&options, &mut LogObserver) {
        Ok(summary) => {
            write_response(json!({
                "records": summary.records,
                "elapsed_ms": summary.elapsed.as_millis() as u64,
            }))?;
            Ok(())
        }
        Err(e) => {
            write_error(e.code().as_str(), e.message())?;
            Err(CliError::restore_failed(e.to_string()))
        }
    }
}

/// Walk a backup stream and report its record count without writing
///
/// Decodes every frame the way restore would, so a clean inspect run
/// means the stream will restore.
pub fn inspect(source: &str) -> CliResult<()> {
    let stream = match BackupSource::open(source) {
        Ok(stream) => stream,
        Err(e) => {
            write_error(e.code().as_str(), e.message())?;
            return Err(CliError::inspect_failed(e.to_string()));
        }
    };

    let mut frames = FrameReader::new(stream);
    loop {
        match frames.read_next() {
            Ok(Some(_)) => {}
            Ok(None) => break,
            Err(e) => {
                write_error(e.code().as_str(), e.message())?;
                return Err(CliError::inspect_failed(e.to_string()));
            }
        }
    }

    write_response(json!({
        "records": frames.frames_read(),
        "bytes": frames.bytes_read(),
    }))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::errors::CliErrorCode;
    use super::*;
    use crate::store::StoreEntry;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_backup(path: &Path, entries: &[StoreEntry]) {
        let mut stream = Vec::new();
        for entry in entries {
            let payload = entry.encode();
            stream.extend_from_slice(&(payload.len() as u64).to_le_bytes());
            stream.extend_from_slice(&payload);
        }
        fs::write(path, stream).unwrap();
    }

    fn create_config(temp_dir: &TempDir, source: &Path) -> PathBuf {
        let config_path = temp_dir.path().join("lodedb.json");
        let store_dir = temp_dir.path().join("store");

        let config = json!({
            "source": source.to_string_lossy(),
            "store_dir": store_dir.to_string_lossy()
        });

        fs::write(&config_path, config.to_string()).unwrap();
        config_path
    }

    #[test]
    fn test_restore_command_end_to_end() {
        let temp_dir = TempDir::new().unwrap();
        let entries: Vec<StoreEntry> = (0..5)
            .map(|i| {
                StoreEntry::versioned(
                    format!("key{}", i).into_bytes(),
                    format!("value{}", i).into_bytes(),
                    i + 1,
                )
            })
            .collect();

        let backup_path = temp_dir.path().join("backup.bin");
        write_backup(&backup_path, &entries);
        let config_path = create_config(&temp_dir, &backup_path);

        restore(&config_path).unwrap();

        let log = fs::read(temp_dir.path().join("store").join("data").join("entries.dat"))
            .unwrap();
        assert_eq!(StoreEntry::decode_all(&log).unwrap(), entries);
    }

    #[test]
    fn test_restore_missing_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("absent.json");

        let result = restore(&config_path);
        assert_eq!(result.unwrap_err().code(), &CliErrorCode::ConfigError);
    }

    #[test]
    fn test_restore_missing_source_fails() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir, &temp_dir.path().join("absent.bin"));

        let result = restore(&config_path);
        assert_eq!(result.unwrap_err().code(), &CliErrorCode::RestoreFailed);
    }

    #[test]
    fn test_config_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let backup_path = temp_dir.path().join("backup.bin");
        write_backup(&backup_path, &[]);
        let config_path = create_config(&temp_dir, &backup_path);

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.batch_threshold, DEFAULT_BATCH_THRESHOLD);
    }

    #[test]
    fn test_config_rejects_zero_threshold() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("lodedb.json");

        let config = json!({
            "source": "backup.bin",
            "store_dir": "store",
            "batch_threshold": 0
        });
        fs::write(&config_path, config.to_string()).unwrap();

        let result = Config::load(&config_path);
        assert_eq!(result.unwrap_err().code(), &CliErrorCode::ConfigError);
    }

    #[test]
    fn test_config_rejects_empty_source() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("lodedb.json");

        let config = json!({
            "source": "",
            "store_dir": "store"
        });
        fs::write(&config_path, config.to_string()).unwrap();

        let result = Config::load(&config_path);
        assert_eq!(result.unwrap_err().code(), &CliErrorCode::ConfigError);
    }

    #[test]
    fn test_inspect_walks_clean_stream() {
        let temp_dir = TempDir::new().unwrap();
        let entries: Vec<StoreEntry> = (0..3)
            .map(|i| StoreEntry::new(format!("k{}", i).into_bytes(), b"v".to_vec()))
            .collect();

        let backup_path = temp_dir.path().join("backup.bin");
        write_backup(&backup_path, &entries);

        inspect(&backup_path.to_string_lossy()).unwrap();
    }

    #[test]
    fn test_inspect_rejects_truncated_stream() {
        let temp_dir = TempDir::new().unwrap();
        let backup_path = temp_dir.path().join("backup.bin");

        let mut stream = 500u64.to_le_bytes().to_vec();
        stream.extend_from_slice(&[0u8; 200]);
        fs::write(&backup_path, stream).unwrap();

        let result = inspect(&backup_path.to_string_lossy());
        assert_eq!(result.unwrap_err().code(), &CliErrorCode::InspectFailed);
    }
}
