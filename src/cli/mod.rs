//! CLI module for lodedb
//!
//! Provides command-line interface for:
//! - restore: Stream a backup into a store
//! - inspect: Walk a backup stream and report its record count

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{inspect, restore, run, run_command, Config};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};
