//! `verify`: check that an archive decodes and is packed contiguously.

use crate::commands::read_file;
use crate::config::VerifyArgs;
use crate::error::Result;
use csxkit_formats::csx::{CsxArchive, verify_layout};
use csxkit_formats::format_file_size;
use tracing::info;

/// Run the `verify` subcommand.
pub fn run(args: &VerifyArgs) -> Result<String> {
    let data = read_file(&args.archive)?;
    let summary = verify_bytes(&data)?;
    info!("{} is well formed", args.archive.display());
    Ok(format!("{}: OK, {summary}", args.archive.display()))
}

/// Decode `data`, check its layout and summarize the contents.
pub fn verify_bytes(data: &[u8]) -> Result<String> {
    let archive = CsxArchive::parse(data)?;
    verify_layout(data)?;

    let stats = archive.stats();
    Ok(format!(
        "{} blocks, {} buildings, {} textures, {} materials, {} of payload",
        stats.blocks,
        stats.buildings,
        stats.textures,
        stats.materials,
        format_file_size(stats.payload_bytes)
    ))
}
