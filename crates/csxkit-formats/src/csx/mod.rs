//! CSX asset bundle format support
//!
//! This module provides parsing and building support for CSX archives, the
//! flat container a block-building game uses to ship block, building and
//! texture assets together with optional per-texture materials.
//!
//! # CSX Structure
//!
//! - **Header** (12 bytes): magic `0xC5F17E01`, table offset, entry count
//! - **Data Region**: asset payloads back to back, starting at offset 12
//! - **Lookup Table**: one 64-byte entry per asset at the table offset
//!
//! Textures are prefixed in the data region by a 76-byte sub-header that
//! names the attached material and records the texture and material lengths.
//!
//! # Endianness
//!
//! Every integer is little-endian except the 4-byte kind word at the start of
//! each table entry, which is written big-endian so the kind tag lands in the
//! first byte.
//!
//! # Basic Usage
//!
//! ## Parsing
//!
//! ```rust,no_run
//! use csxkit_formats::csx::CsxArchive;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("build.csx")?;
//! let archive = CsxArchive::parse(&data)?;
//!
//! for asset in &archive {
//!     println!("{} {} ({} bytes)", asset.kind(), asset.name(), asset.data().len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Building
//!
//! ```rust,no_run
//! use csxkit_formats::csx::{Asset, CsxBuilder, EntryOrder, Material};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = CsxBuilder::new()
//!     .with_order(EntryOrder::Legacy)
//!     .add_asset(Asset::block("rock", std::fs::read("rock.sbl")?))
//!     .add_asset(Asset::texture_with_material(
//!         "grass",
//!         std::fs::read("grass.png")?,
//!         Material::new("grass_shine", std::fs::read("grass_shine.png")?),
//!     ))
//!     .build()?;
//!
//! std::fs::write("build.csx", data)?;
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod asset;
pub mod builder;
pub mod codec;
pub mod entry;
pub mod error;
pub mod header;
pub mod texture;

pub use archive::{
    ArchiveStats, CsxArchive, CsxTable, EntryPayload, Extent, ParseOptions, entry_payload,
    read_table, verify_layout,
};
pub use asset::{Asset, AssetKind, Material, strip_extension};
pub use builder::{BuildOptions, CsxBuilder, EntryOrder};
pub use entry::TableEntry;
pub use error::{CsxError, Result};
pub use header::CsxHeader;
pub use texture::TextureHeader;

/// Magic value at offset 0 of every CSX archive
pub const CSX_MAGIC: u32 = 0xC5F1_7E01;

/// Size of the file header
pub const HEADER_SIZE: usize = 12;

/// Size of one lookup table entry
pub const TABLE_ENTRY_SIZE: usize = 0x40;

/// Width of the name field in a table entry
pub const TABLE_NAME_SIZE: usize = 0x34;

/// Size of the texture sub-header
pub const TEXTURE_HEADER_SIZE: usize = 0x4C;

/// Width of the material name field in the texture sub-header
pub const MATERIAL_NAME_SIZE: usize = 0x40;

/// Low three bytes of every table entry kind word
pub const TABLE_MARKER: u32 = 0x00_5A58;

/// Value forced into the first byte of block and building payloads
pub const BLOCK_MARKER: u8 = 0x01;

/// Folder name used when exporting texture materials
pub const MATERIAL_FOLDER: &str = "texturematerial";

/// Encode assets into a CSX archive, preserving their order
pub fn encode_archive(assets: &[Asset]) -> Result<Vec<u8>> {
    builder::encode(assets, &BuildOptions::default())
}

/// Decode a CSX archive into its assets, in table order
pub fn decode_archive(data: &[u8]) -> Result<Vec<Asset>> {
    CsxArchive::parse(data).map(CsxArchive::into_assets)
}
