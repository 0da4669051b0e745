//! CSX archive decoder and in-memory archive

use crate::csx::{
    HEADER_SIZE, TABLE_ENTRY_SIZE, TEXTURE_HEADER_SIZE,
    asset::{Asset, AssetKind, Material},
    builder::{BuildOptions, encode},
    codec,
    entry::TableEntry,
    error::{CsxError, Result},
    header::CsxHeader,
    texture::TextureHeader,
};
use binrw::{BinRead, io::Cursor};
use tracing::{debug, warn};

/// Options controlling how an archive is parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Reject archives whose header magic is not `0xC5F17E01`
    pub verify_magic: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { verify_magic: true }
    }
}

impl ParseOptions {
    /// Options that accept any header magic
    pub fn lenient() -> Self {
        Self {
            verify_magic: false,
        }
    }
}

/// Header and raw lookup table of an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsxTable {
    /// File header
    pub header: CsxHeader,
    /// Table entries in on-disk order, including unrecognized tags
    pub entries: Vec<TableEntry>,
}

/// Byte range an entry actually occupies in the data region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    /// Absolute start offset
    pub offset: u64,
    /// Number of bytes occupied
    pub len: u64,
}

impl Extent {
    /// First offset past the extent
    pub fn end(&self) -> u64 {
        self.offset + self.len
    }
}

impl CsxTable {
    /// Compute the on-disk footprint of each entry
    ///
    /// Blocks, buildings and unrecognized tags occupy `size` bytes. Textures
    /// occupy their sub-header plus the texture and material lengths it
    /// records.
    pub fn extents(&self, data: &[u8]) -> Result<Vec<Extent>> {
        self.entries
            .iter()
            .map(|entry| {
                let len = match entry.kind() {
                    Some(AssetKind::Texture) => {
                        TextureHeader::parse(data, entry.offset as usize)?.footprint()
                    }
                    _ => u64::from(entry.size),
                };
                Ok(Extent {
                    offset: u64::from(entry.offset),
                    len,
                })
            })
            .collect()
    }
}

/// Read the header and lookup table without decoding any asset
pub fn read_table(data: &[u8], options: &ParseOptions) -> Result<CsxTable> {
    let header_bytes = codec::slice(data, 0, HEADER_SIZE)?;
    let header = CsxHeader::read(&mut Cursor::new(header_bytes))?;

    if options.verify_magic {
        header.validate()?;
    } else if header.validate().is_err() {
        warn!("Ignoring unexpected CSX magic {:#010x}", header.magic);
    }

    let table_start = header.table_offset as usize;
    let table_len = (header.entry_count as usize)
        .checked_mul(TABLE_ENTRY_SIZE)
        .ok_or(CsxError::Truncated {
            offset: u64::from(header.table_offset),
            len: u64::from(header.entry_count) * TABLE_ENTRY_SIZE as u64,
            available: data.len(),
        })?;
    codec::slice(data, table_start, table_len)?;

    let entries = (0..header.entry_count as usize)
        .map(|index| TableEntry::parse(data, table_start + index * TABLE_ENTRY_SIZE))
        .collect::<Result<Vec<_>>>()?;

    Ok(CsxTable { header, entries })
}

/// Check that the data region is packed exactly as the table describes
///
/// The first entry must start right after the header, each entry must end
/// where the next begins, and the last must end at the table offset.
pub fn verify_layout(data: &[u8]) -> Result<()> {
    let table = read_table(data, &ParseOptions::default())?;
    let extents = table.extents(data)?;

    let mut expected = HEADER_SIZE as u64;
    for (index, extent) in extents.iter().enumerate() {
        if extent.offset != expected {
            return Err(CsxError::LayoutMismatch {
                index,
                expected,
                actual: extent.offset,
            });
        }
        expected = extent.end();
    }

    let table_offset = u64::from(table.header.table_offset);
    if table_offset != expected {
        return Err(CsxError::LayoutMismatch {
            index: extents.len(),
            expected,
            actual: table_offset,
        });
    }

    Ok(())
}

/// Payload bytes of one table entry, borrowed from the archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPayload<'a> {
    /// Asset bytes; texture bytes only for textures
    pub data: &'a [u8],
    /// Material name and bytes, for textures carrying one
    pub material: Option<(String, &'a [u8])>,
}

/// Locate the payload of `entry` inside `data`
///
/// Blocks, buildings and unrecognized tags span `size` bytes at the entry
/// offset. Textures are read through their sub-header; a material with an
/// empty name takes the entry name.
pub fn entry_payload<'a>(data: &'a [u8], entry: &TableEntry) -> Result<EntryPayload<'a>> {
    let offset = entry.offset as usize;
    if entry.kind() != Some(AssetKind::Texture) {
        return Ok(EntryPayload {
            data: codec::slice(data, offset, entry.size as usize)?,
            material: None,
        });
    }

    let header = TextureHeader::parse(data, offset)?;
    let texture_at = offset + TEXTURE_HEADER_SIZE;
    let texture = codec::slice(data, texture_at, header.texture_len as usize)?;

    let material = if header.material_len > 0 {
        let material_at = texture_at + texture.len();
        let bytes = codec::slice(data, material_at, header.material_len as usize)?;
        let name = if header.material_name.is_empty() {
            entry.name.clone()
        } else {
            header.material_name
        };
        Some((name, bytes))
    } else {
        None
    };

    Ok(EntryPayload {
        data: texture,
        material,
    })
}

/// Decode the asset described by `entry`
///
/// Returns `Ok(None)` for entries with an unrecognized tag.
fn decode_entry(data: &[u8], entry: &TableEntry) -> Result<Option<Asset>> {
    let Some(kind) = entry.kind() else {
        warn!(
            "Skipping '{}': unknown table tag {:#04x}",
            entry.name, entry.tag
        );
        return Ok(None);
    };

    let payload = entry_payload(data, entry)?;
    let asset = match kind {
        AssetKind::Block | AssetKind::Building => {
            Asset::new(kind, entry.name.clone(), payload.data)
        }
        AssetKind::Texture => Asset::Texture {
            name: entry.name.clone(),
            data: payload.data.to_vec(),
            material: payload
                .material
                .map(|(name, bytes)| Material::new(name, bytes)),
        },
    };

    Ok(Some(asset))
}

/// Decoded CSX archive: an ordered list of assets
///
/// # Example
///
/// ```rust
/// use csxkit_formats::csx::{Asset, CsxArchive, Material};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut archive = CsxArchive::new();
/// archive.push(Asset::block("rock", vec![0x00, 0x01, 0x02, 0x03]));
/// archive.push(Asset::texture_with_material(
///     "grass",
///     vec![0x89, 0x50, 0x4E, 0x47],
///     Material::new("grass_mat", vec![0x89, 0x50]),
/// ));
///
/// let data = archive.build()?;
/// let parsed = CsxArchive::parse(&data)?;
/// assert_eq!(parsed.len(), 2);
/// assert_eq!(parsed.assets()[0].data(), &[0x01, 0x01, 0x02, 0x03]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsxArchive {
    assets: Vec<Asset>,
}

impl CsxArchive {
    /// Create an empty archive
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an archive holding `assets` in order
    pub fn from_assets(assets: Vec<Asset>) -> Self {
        Self { assets }
    }

    /// Parse an archive, rejecting unexpected header magic
    ///
    /// # Errors
    /// Returns error if:
    /// - The header magic is not `0xC5F17E01`
    /// - The header, table or any referenced payload lies past the end of `data`
    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::parse_with(data, &ParseOptions::default())
    }

    /// Parse an archive with explicit options
    pub fn parse_with(data: &[u8], options: &ParseOptions) -> Result<Self> {
        let table = read_table(data, options)?;

        let mut assets = Vec::with_capacity(table.entries.len());
        for entry in &table.entries {
            if let Some(asset) = decode_entry(data, entry)? {
                assets.push(asset);
            }
        }

        debug!(
            "Parsed CSX archive: {} of {} entries decoded",
            assets.len(),
            table.entries.len()
        );

        Ok(Self { assets })
    }

    /// Encode the archive preserving asset order
    pub fn build(&self) -> Result<Vec<u8>> {
        self.build_with(&BuildOptions::default())
    }

    /// Encode the archive with explicit options
    pub fn build_with(&self, options: &BuildOptions) -> Result<Vec<u8>> {
        encode(&self.assets, options)
    }

    /// Append an asset
    pub fn push(&mut self, asset: Asset) {
        self.assets.push(asset);
    }

    /// Assets in archive order
    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    /// Consume the archive, returning its assets
    pub fn into_assets(self) -> Vec<Asset> {
        self.assets
    }

    /// Iterate over assets in archive order
    pub fn iter(&self) -> std::slice::Iter<'_, Asset> {
        self.assets.iter()
    }

    /// Number of assets
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Whether the archive holds no assets
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Find the first asset of `kind` named `name`
    pub fn find(&self, kind: AssetKind, name: &str) -> Option<&Asset> {
        self.assets
            .iter()
            .find(|asset| asset.kind() == kind && asset.name() == name)
    }

    /// Get statistics about the archive
    pub fn stats(&self) -> ArchiveStats {
        let count = |kind| self.assets.iter().filter(|a| a.kind() == kind).count();

        ArchiveStats {
            blocks: count(AssetKind::Block),
            buildings: count(AssetKind::Building),
            textures: count(AssetKind::Texture),
            materials: self
                .assets
                .iter()
                .filter(|a| a.material().is_some())
                .count(),
            payload_bytes: self.assets.iter().map(|a| a.payload_len() as u64).sum(),
        }
    }
}

impl From<Vec<Asset>> for CsxArchive {
    fn from(assets: Vec<Asset>) -> Self {
        Self::from_assets(assets)
    }
}

impl IntoIterator for CsxArchive {
    type Item = Asset;
    type IntoIter = std::vec::IntoIter<Asset>;

    fn into_iter(self) -> Self::IntoIter {
        self.assets.into_iter()
    }
}

impl<'a> IntoIterator for &'a CsxArchive {
    type Item = &'a Asset;
    type IntoIter = std::slice::Iter<'a, Asset>;

    fn into_iter(self) -> Self::IntoIter {
        self.assets.iter()
    }
}

/// Statistics about a CSX archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArchiveStats {
    /// Number of block assets
    pub blocks: usize,
    /// Number of building assets
    pub buildings: usize,
    /// Number of texture assets
    pub textures: usize,
    /// Number of textures carrying a material
    pub materials: usize,
    /// Total payload bytes, including materials
    pub payload_bytes: u64,
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::csx::{CSX_MAGIC, codec::write_u32_le};
    use pretty_assertions::assert_eq;

    fn sample_archive() -> CsxArchive {
        CsxArchive::from_assets(vec![
            Asset::texture_with_material(
                "grass",
                vec![0x89, 0x50, 0x4E, 0x47, 0x0D],
                Material::new("grass_mat", vec![0x11, 0x22, 0x33]),
            ),
            Asset::block("rock", vec![0x00, 0x01, 0x02, 0x03]),
            Asset::building("house", vec![0x05, 0x06]),
            Asset::texture("sky", vec![0xFF; 8]),
        ])
    }

    #[test]
    fn test_round_trip_mixed() {
        let archive = sample_archive();
        let data = archive.build().expect("Operation should succeed");
        let parsed = CsxArchive::parse(&data).expect("Operation should succeed");

        let expected = CsxArchive::from_assets(vec![
            Asset::texture_with_material(
                "grass",
                vec![0x89, 0x50, 0x4E, 0x47, 0x0D],
                Material::new("grass_mat", vec![0x11, 0x22, 0x33]),
            ),
            Asset::block("rock", vec![0x01, 0x01, 0x02, 0x03]),
            Asset::building("house", vec![0x01, 0x06]),
            Asset::texture("sky", vec![0xFF; 8]),
        ]);
        assert_eq!(parsed, expected);
        verify_layout(&data).expect("Operation should succeed");
    }

    #[test]
    fn test_material_name_falls_back_to_asset_name() {
        let archive = CsxArchive::from_assets(vec![Asset::texture_with_material(
            "stone",
            vec![1, 2, 3],
            Material::new("", vec![4, 5]),
        )]);
        let data = archive.build().expect("Operation should succeed");
        let parsed = CsxArchive::parse(&data).expect("Operation should succeed");

        let material = parsed.assets()[0]
            .material()
            .expect("Operation should succeed");
        assert_eq!(material.name, "stone");
        assert_eq!(material.data, vec![4, 5]);
    }

    #[test]
    fn test_empty_material_is_dropped() {
        // A zero-length material cannot be told apart from no material on disk
        let archive = CsxArchive::from_assets(vec![Asset::texture_with_material(
            "stone",
            vec![1],
            Material::new("unused", vec![]),
        )]);
        let data = archive.build().expect("Operation should succeed");
        let parsed = CsxArchive::parse(&data).expect("Operation should succeed");
        assert!(parsed.assets()[0].material().is_none());
    }

    #[test]
    fn test_magic_mismatch() {
        let mut data = sample_archive().build().expect("Operation should succeed");
        write_u32_le(&mut data, 0, 0x1234_5678).expect("Operation should succeed");

        assert!(matches!(
            CsxArchive::parse(&data),
            Err(CsxError::MagicMismatch {
                expected: CSX_MAGIC,
                actual: 0x1234_5678
            })
        ));

        let lenient = CsxArchive::parse_with(&data, &ParseOptions::lenient())
            .expect("Operation should succeed");
        assert_eq!(lenient.len(), 4);
    }

    #[test]
    fn test_unknown_tag_skipped() {
        let mut data = sample_archive().build().expect("Operation should succeed");
        let table_offset = codec::read_u32_le(&data, 4).unwrap() as usize;
        // Retag the block entry
        data[table_offset + TABLE_ENTRY_SIZE] = 0x08;

        let parsed = CsxArchive::parse(&data).expect("Operation should succeed");
        let names: Vec<&str> = parsed.iter().map(Asset::name).collect();
        assert_eq!(names, vec!["grass", "house", "sky"]);

        let table = read_table(&data, &ParseOptions::default()).expect("Operation should succeed");
        assert_eq!(table.entries.len(), 4);
        assert_eq!(table.entries[1].kind(), None);
    }

    #[test]
    fn test_truncated_inputs() {
        let data = sample_archive().build().expect("Operation should succeed");

        // Shorter than the header
        assert!(matches!(
            CsxArchive::parse(&data[..8]),
            Err(CsxError::Truncated { .. })
        ));

        // Table cut off
        assert!(matches!(
            CsxArchive::parse(&data[..data.len() - 1]),
            Err(CsxError::Truncated { .. })
        ));

        // Payload offset pointing past the end
        let mut corrupt = data;
        let table_offset = codec::read_u32_le(&corrupt, 4).unwrap() as usize;
        let block_entry = table_offset + TABLE_ENTRY_SIZE;
        write_u32_le(&mut corrupt, block_entry + 4, 0x00FF_FFFF).unwrap();
        assert!(matches!(
            CsxArchive::parse(&corrupt),
            Err(CsxError::Truncated { .. })
        ));
    }

    #[test]
    fn test_huge_entry_count_is_truncated() {
        let mut data = sample_archive().build().expect("Operation should succeed");
        write_u32_le(&mut data, 8, u32::MAX).unwrap();

        assert!(matches!(
            read_table(&data, &ParseOptions::default()),
            Err(CsxError::Truncated { .. })
        ));
        assert!(matches!(
            CsxArchive::parse(&data),
            Err(CsxError::Truncated { .. })
        ));
    }

    #[test]
    fn test_entry_payload() {
        let data = sample_archive().build().expect("Operation should succeed");
        let table = read_table(&data, &ParseOptions::default()).expect("Operation should succeed");

        let grass = entry_payload(&data, &table.entries[0]).expect("Operation should succeed");
        assert_eq!(grass.data, &[0x89, 0x50, 0x4E, 0x47, 0x0D]);
        assert_eq!(
            grass.material,
            Some(("grass_mat".to_string(), &[0x11, 0x22, 0x33][..]))
        );

        let rock = entry_payload(&data, &table.entries[1]).expect("Operation should succeed");
        assert_eq!(rock.data, &[0x01, 0x01, 0x02, 0x03]);
        assert!(rock.material.is_none());

        let sky = entry_payload(&data, &table.entries[3]).expect("Operation should succeed");
        assert_eq!(sky.data, &[0xFF; 8]);
        assert!(sky.material.is_none());
    }

    #[test]
    fn test_oversized_texture_length() {
        let mut data = CsxArchive::from_assets(vec![Asset::texture("sky", vec![1, 2, 3])])
            .build()
            .expect("Operation should succeed");
        // texture length field of the sub-header
        write_u32_le(&mut data, 12 + 0x44, 1000).unwrap();
        assert!(matches!(
            CsxArchive::parse(&data),
            Err(CsxError::Truncated { .. })
        ));
    }

    #[test]
    fn test_verify_layout_detects_gap() {
        let mut data = sample_archive().build().expect("Operation should succeed");
        let table_offset = codec::read_u32_le(&data, 4).unwrap() as usize;
        // Point the block entry one byte too far
        let block_entry = table_offset + TABLE_ENTRY_SIZE;
        let offset = codec::read_u32_le(&data, block_entry + 4).unwrap();
        write_u32_le(&mut data, block_entry + 4, offset + 1).unwrap();

        assert!(matches!(
            verify_layout(&data),
            Err(CsxError::LayoutMismatch { index: 1, .. })
        ));
    }

    #[test]
    fn test_extents() {
        let data = sample_archive().build().expect("Operation should succeed");
        let table = read_table(&data, &ParseOptions::default()).expect("Operation should succeed");
        let extents = table.extents(&data).expect("Operation should succeed");

        let lens: Vec<u64> = extents.iter().map(|e| e.len).collect();
        assert_eq!(lens, vec![76 + 5 + 3, 4, 2, 76 + 8]);
        assert_eq!(extents[0].offset, 12);
    }

    #[test]
    fn test_stats() {
        let stats = sample_archive().stats();
        assert_eq!(
            stats,
            ArchiveStats {
                blocks: 1,
                buildings: 1,
                textures: 2,
                materials: 1,
                payload_bytes: 5 + 3 + 4 + 2 + 8,
            }
        );
    }

    #[test]
    fn test_find() {
        let archive = sample_archive();
        assert!(archive.find(AssetKind::Block, "rock").is_some());
        assert!(archive.find(AssetKind::Texture, "rock").is_none());
    }

    #[test]
    fn test_empty_archive_round_trip() {
        let data = CsxArchive::new().build().expect("Operation should succeed");
        let parsed = CsxArchive::parse(&data).expect("Operation should succeed");
        assert!(parsed.is_empty());
        verify_layout(&data).expect("Operation should succeed");
    }
}
