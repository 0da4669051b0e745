//! Command line front end for CSX asset bundles.
//!
//! The `csxkit` binary is a thin wrapper around this library: it parses
//! [`CliConfig`], initializes logging and hands the selected [`Command`] to
//! [`commands::run`].
//!
//! # Subcommands
//!
//! - `unpack`: extract an archive into `block/`, `building/`, `texture/` and
//!   `texturematerial/` folders
//! - `pack`: build an archive from loose files or folders
//! - `list`: print the lookup table, as text or JSON
//! - `verify`: check that an archive decodes and is packed contiguously
//!
//! # Example
//!
//! ```no_run
//! use csxkit::{CliConfig, commands};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = CliConfig::from_args();
//!     config.validate()?;
//!     println!("{}", commands::run(&config.command)?);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod commands;
pub mod config;
pub mod error;

pub use config::{CliConfig, Command};
pub use error::{CliError, Result};
