//! CLI argument definitions using clap
//!
//! Commands:
//! - lodedb restore --config <path>
//! - lodedb inspect --source <location>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// lodedb - streaming backup restore for the lodedb key-value store
#[derive(Parser, Debug)]
#[command(name = "lodedb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Restore a store from a backup stream
    Restore {
        /// Path to configuration file
        #[arg(long, default_value = "./lodedb.json")]
        config: PathBuf,
    },

    /// Walk a backup stream and report its record count without writing
    Inspect {
        /// Backup location: a path or file:// URI
        #[arg(long)]
        source: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
