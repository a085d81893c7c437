//! CLI module for gymstore
//!
//! Replaces the management screens with one command per operation. Every
//! command prints exactly one JSON object on stdout.

mod args;
mod commands;
mod config;
mod errors;
mod io;
mod logging;

pub use args::{Cli, Command};
pub use commands::{run, run_command};
pub use config::{Config, LogFormat};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};
pub use logging::init_logging;
