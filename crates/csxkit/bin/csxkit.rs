//! csxkit binary entry point.
//!
//! This is a thin wrapper around the csxkit library that:
//! 1. Parses command-line arguments
//! 2. Initializes logging
//! 3. Validates configuration
//! 4. Runs the selected subcommand
//!
//! For library usage, see the csxkit crate documentation.

use anyhow::{Context, Result};
use csxkit::{CliConfig, commands};

fn main() -> Result<()> {
    let config = CliConfig::from_args();

    // RUST_LOG wins over --log-level
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Configuration loaded: {:?}", config.command);

    config.validate()?;

    let report = commands::run(&config.command).context("csxkit failed")?;
    println!("{report}");

    Ok(())
}
