//! CSX archive encoder and builder

use crate::csx::{
    BLOCK_MARKER, HEADER_SIZE, TABLE_ENTRY_SIZE, TEXTURE_HEADER_SIZE,
    archive::CsxArchive,
    asset::{Asset, strip_extension},
    codec,
    entry::TableEntry,
    error::{CsxError, Result},
    header::CsxHeader,
    texture::TextureHeader,
};
use binrw::{BinWrite, io::Cursor};
use tracing::{debug, trace};

/// Order in which assets are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryOrder {
    /// Keep the caller's order
    #[default]
    Preserve,
    /// Buildings first, then blocks, then textures; stable within a kind
    Legacy,
}

/// Options controlling how an archive is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildOptions {
    /// Order of assets in the data region and table
    pub order: EntryOrder,
}

/// Where one asset lands in the output
struct Placement<'a> {
    asset: &'a Asset,
    offset: u32,
    size: u32,
}

/// Convert a layout position to a 32-bit field
fn fit_u32(value: u64) -> Result<u32> {
    u32::try_from(value).map_err(|_| CsxError::ArchiveTooLarge(value))
}

/// Assign data offsets and compute the table offset and total length
///
/// Offsets advance by each asset's full stored length, so textures account
/// for their sub-header and material bytes.
fn plan_layout<'a>(assets: &[&'a Asset]) -> Result<(Vec<Placement<'a>>, u32, usize)> {
    let mut placements = Vec::with_capacity(assets.len());
    let mut position = HEADER_SIZE as u64;

    for &asset in assets {
        placements.push(Placement {
            asset,
            offset: fit_u32(position)?,
            size: fit_u32(asset.data().len() as u64)?,
        });
        position += asset.stored_len() as u64;
    }

    let table_offset = fit_u32(position)?;
    let total = position + (assets.len() * TABLE_ENTRY_SIZE) as u64;
    fit_u32(total)?;

    Ok((placements, table_offset, total as usize))
}

/// Write one asset's data region bytes
fn write_data(buffer: &mut [u8], placement: &Placement<'_>) -> Result<()> {
    let at = placement.offset as usize;

    match placement.asset {
        Asset::Block { data, .. } | Asset::Building { data, .. } => {
            codec::copy_bytes(buffer, at, data)?;
            // The game expects the first byte of every block/building to be 1
            if !data.is_empty() {
                buffer[at] = BLOCK_MARKER;
            }
        }
        Asset::Texture { data, material, .. } => {
            let (material_name, material_data) = material
                .as_ref()
                .map_or(("", &[][..]), |m| (m.name.as_str(), m.data.as_slice()));

            TextureHeader::new(material_name, placement.size, material_data.len() as u32)
                .write(buffer, at)?;

            let texture_at = at + TEXTURE_HEADER_SIZE;
            codec::copy_bytes(buffer, texture_at, data)?;
            codec::copy_bytes(buffer, texture_at + data.len(), material_data)?;
        }
    }

    Ok(())
}

/// Encode `assets` into a CSX byte buffer
pub(crate) fn encode(assets: &[Asset], options: &BuildOptions) -> Result<Vec<u8>> {
    let mut ordered: Vec<&Asset> = assets.iter().collect();
    if options.order == EntryOrder::Legacy {
        ordered.sort_by_key(|asset| asset.kind().legacy_rank());
    }

    let (placements, table_offset, total) = plan_layout(&ordered)?;
    let entry_count = fit_u32(placements.len() as u64)?;

    debug!(
        "Building CSX archive: {} entries, table at {:#x}, {} bytes",
        entry_count, table_offset, total
    );

    let mut buffer = vec![0u8; total];

    let mut header = Cursor::new(Vec::with_capacity(HEADER_SIZE));
    CsxHeader::new(table_offset, entry_count).write(&mut header)?;
    codec::copy_bytes(&mut buffer, 0, header.get_ref())?;

    for placement in &placements {
        trace!(
            "Writing {} '{}' at {:#x}",
            placement.asset.kind(),
            placement.asset.name(),
            placement.offset
        );
        write_data(&mut buffer, placement)?;
    }

    for (index, placement) in placements.iter().enumerate() {
        let entry = TableEntry::new(
            placement.asset.kind(),
            placement.offset,
            placement.size,
            strip_extension(placement.asset.name()),
        );
        entry.write(&mut buffer, table_offset as usize + index * TABLE_ENTRY_SIZE)?;
    }

    Ok(buffer)
}

/// Builder for creating CSX archives
///
/// # Example
///
/// ```rust
/// use csxkit_formats::csx::{CsxArchive, CsxBuilder, EntryOrder};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let data = CsxBuilder::new()
///     .with_order(EntryOrder::Preserve)
///     .add_file("rock.sbl", vec![0x00, 0x01, 0x02, 0x03])
///     .add_file("notes.txt", b"ignored".to_vec())
///     .build()?;
///
/// let archive = CsxArchive::parse(&data)?;
/// assert_eq!(archive.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct CsxBuilder {
    assets: Vec<Asset>,
    options: BuildOptions,
}

impl CsxBuilder {
    /// Create a new empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the assets of an existing archive
    pub fn from_archive(archive: &CsxArchive) -> Self {
        Self {
            assets: archive.assets().to_vec(),
            options: BuildOptions::default(),
        }
    }

    /// Set the entry order
    #[must_use]
    pub fn with_order(mut self, order: EntryOrder) -> Self {
        self.options.order = order;
        self
    }

    /// Add an asset
    #[must_use]
    pub fn add_asset(mut self, asset: Asset) -> Self {
        self.assets.push(asset);
        self
    }

    /// Add a loose file, deriving its kind from the extension
    ///
    /// Files with an unsupported extension are skipped.
    #[must_use]
    pub fn add_file(mut self, file_name: &str, data: Vec<u8>) -> Self {
        match Asset::from_file_name(file_name, data) {
            Some(asset) => self.assets.push(asset),
            None => debug!("Skipping '{}': not a block, building or texture", file_name),
        }
        self
    }

    /// Number of assets added so far
    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }

    /// Options that will be used by [`build`](Self::build)
    pub fn options(&self) -> BuildOptions {
        self.options
    }

    /// Collect the added assets into an archive without encoding
    pub fn into_archive(self) -> CsxArchive {
        CsxArchive::from_assets(self.assets)
    }

    /// Encode the added assets
    pub fn build(&self) -> Result<Vec<u8>> {
        encode(&self.assets, &self.options)
    }
}
