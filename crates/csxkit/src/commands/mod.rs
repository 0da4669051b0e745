//! Subcommand implementations.
//!
//! Each subcommand returns the report to print on success. Progress and
//! diagnostics go through `tracing`.

pub mod list;
pub mod pack;
pub mod unpack;
pub mod verify;

use crate::config::Command;
use crate::error::{CliError, Result};
use std::path::Path;

/// Run a parsed subcommand.
pub fn run(command: &Command) -> Result<String> {
    match command {
        Command::Unpack(args) => unpack::run(args),
        Command::Pack(args) => pack::run(args),
        Command::List(args) => list::run(args),
        Command::Verify(args) => verify::run(args),
    }
}

pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| CliError::read(path, e))
}

pub(crate) fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    std::fs::write(path, data).map_err(|e| CliError::write(path, e))
}
