//! Error types for the csxkit command line tool.

use csxkit_formats::{CsxError, StoreError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while running a subcommand.
#[derive(Debug, Error)]
pub enum CliError {
    /// Failed to read an input file
    #[error("Failed to read {path}: {source}")]
    Read {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to write an output file or directory
    #[error("Failed to write {path}: {source}")]
    Write {
        /// File or directory that could not be written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to traverse an input directory
    #[error("Failed to walk {path}: {source}")]
    Walk {
        /// Directory being traversed
        path: PathBuf,
        /// Underlying traversal error
        #[source]
        source: walkdir::Error,
    },

    /// Input path does not exist
    #[error("Input not found: {0}")]
    MissingInput(PathBuf),

    /// `--material` value is not of the form TEXTURE=PATH
    #[error("Invalid material '{0}': expected TEXTURE=PATH")]
    InvalidMaterialSpec(String),

    /// `--material` names a texture that is not among the inputs
    #[error("No texture named '{0}' among the pack inputs")]
    UnknownTexture(String),

    /// Archive could not be parsed or built
    #[error(transparent)]
    Csx(#[from] CsxError),

    /// Asset store rejected an edit
    #[error(transparent)]
    Store(#[from] StoreError),

    /// JSON listing could not be produced
    #[error("Failed to encode listing: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Wrap a read failure on `path`.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Wrap a write failure on `path`.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

/// Type alias for command results
pub type Result<T> = std::result::Result<T, CliError>;
