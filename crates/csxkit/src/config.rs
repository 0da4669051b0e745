//! Command line configuration.
//!
//! Options come from CLI arguments, environment variables and defaults, in
//! that order of precedence.
//!
//! # Environment
//!
//! - `CSXKIT_LOG`: log level when `RUST_LOG` is unset (default `info`)
//! - `CSXKIT_OUTPUT_DIR`: output directory for `unpack` (default `./csx`)
//! - `CSXKIT_OUTPUT`: output archive for `pack` (default `build.csx`)
//!
//! # Example
//!
//! ```no_run
//! use csxkit::CliConfig;
//!
//! let config = CliConfig::from_args();
//! config.validate().expect("Invalid configuration");
//! ```

use crate::error::CliError;
use clap::{Args, Parser, Subcommand};
use csxkit_formats::csx::{BuildOptions, EntryOrder, ParseOptions};
use std::path::PathBuf;
use std::str::FromStr;

/// Top-level configuration loaded from CLI args and environment variables.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "csxkit",
    about = "Pack, unpack and inspect CSX asset bundles",
    version
)]
pub struct CliConfig {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, env = "CSXKIT_LOG", default_value = "info")]
    pub log_level: String,

    /// Operation to run
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Extract every asset of an archive into kind folders
    Unpack(UnpackArgs),
    /// Build an archive from loose asset files
    Pack(PackArgs),
    /// Print the lookup table of an archive
    List(ListArgs),
    /// Check that an archive parses and is packed contiguously
    Verify(VerifyArgs),
}

/// Arguments for `unpack`.
#[derive(Debug, Clone, Args)]
pub struct UnpackArgs {
    /// Archive to read
    pub archive: PathBuf,

    /// Directory receiving the kind folders
    #[arg(short, long, env = "CSXKIT_OUTPUT_DIR", default_value = "./csx")]
    pub output: PathBuf,

    /// Accept archives with an unexpected magic value
    #[arg(long)]
    pub lenient: bool,
}

impl UnpackArgs {
    /// Parse options selected by the flags.
    pub fn parse_options(&self) -> ParseOptions {
        parse_options(self.lenient)
    }
}

/// Arguments for `pack`.
#[derive(Debug, Clone, Args)]
pub struct PackArgs {
    /// Asset files or directories to include
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Archive to write
    #[arg(short, long, env = "CSXKIT_OUTPUT", default_value = "build.csx")]
    pub output: PathBuf,

    /// Store buildings, then blocks, then textures
    #[arg(long)]
    pub legacy_order: bool,

    /// Attach a material image to a texture, as TEXTURE=PATH
    #[arg(long = "material", value_name = "TEXTURE=PATH")]
    pub materials: Vec<MaterialSpec>,
}

impl PackArgs {
    /// Build options selected by the flags.
    pub fn build_options(&self) -> BuildOptions {
        let order = if self.legacy_order {
            EntryOrder::Legacy
        } else {
            EntryOrder::Preserve
        };
        BuildOptions { order }
    }
}

/// Arguments for `list`.
#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    /// Archive to read
    pub archive: PathBuf,

    /// Print one JSON document instead of a table
    #[arg(long)]
    pub json: bool,

    /// Accept archives with an unexpected magic value
    #[arg(long)]
    pub lenient: bool,
}

impl ListArgs {
    /// Parse options selected by the flags.
    pub fn parse_options(&self) -> ParseOptions {
        parse_options(self.lenient)
    }
}

/// Arguments for `verify`.
#[derive(Debug, Clone, Args)]
pub struct VerifyArgs {
    /// Archive to check
    pub archive: PathBuf,
}

fn parse_options(lenient: bool) -> ParseOptions {
    if lenient {
        ParseOptions::lenient()
    } else {
        ParseOptions::default()
    }
}

/// Explicit texture to material pairing given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialSpec {
    /// Name of the texture receiving the material
    pub texture: String,
    /// Image file holding the material
    pub path: PathBuf,
}

impl FromStr for MaterialSpec {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((texture, path)) if !texture.is_empty() && !path.is_empty() => Ok(Self {
                texture: texture.to_string(),
                path: PathBuf::from(path),
            }),
            _ => Err(CliError::InvalidMaterialSpec(s.to_string())),
        }
    }
}

impl CliConfig {
    /// Parse configuration from command-line arguments.
    #[must_use]
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Validate configuration.
    ///
    /// # Errors
    ///
    /// Returns `CliError::MissingInput` if an archive or pack input does not
    /// exist.
    pub fn validate(&self) -> Result<(), CliError> {
        let required: Vec<&PathBuf> = match &self.command {
            Command::Unpack(args) => vec![&args.archive],
            Command::List(args) => vec![&args.archive],
            Command::Verify(args) => vec![&args.archive],
            Command::Pack(args) => args
                .inputs
                .iter()
                .chain(args.materials.iter().map(|m| &m.path))
                .collect(),
        };

        match required.into_iter().find(|path| !path.exists()) {
            Some(missing) => Err(CliError::MissingInput(missing.clone())),
            None => Ok(()),
        }
    }
}
