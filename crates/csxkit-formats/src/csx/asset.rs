//! In-memory asset model

use crate::csx::{TABLE_MARKER, TEXTURE_HEADER_SIZE};
use std::fmt;

/// Kind of asset stored in a CSX archive
///
/// The kind is recorded in the first byte of each table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// Block definition (`.sbl`)
    Block,
    /// Building definition (`.sbb`)
    Building,
    /// Texture image (`.png`), optionally carrying a material
    Texture,
}

impl AssetKind {
    /// All kinds in tag order
    pub const ALL: [Self; 3] = [Self::Block, Self::Building, Self::Texture];

    /// Table entry tag byte
    pub const fn tag(self) -> u8 {
        match self {
            Self::Block => 0x01,
            Self::Building => 0x02,
            Self::Texture => 0x04,
        }
    }

    /// Convert from a table entry tag byte
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0x01 => Some(Self::Block),
            0x02 => Some(Self::Building),
            0x04 => Some(Self::Texture),
            _ => None,
        }
    }

    /// Full 4-byte kind word as written (big-endian) into a table entry
    pub const fn kind_word(self) -> u32 {
        ((self.tag() as u32) << 24) | TABLE_MARKER
    }

    /// File extension used for loose files of this kind
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Block => "sbl",
            Self::Building => "sbb",
            Self::Texture => "png",
        }
    }

    /// Convert from a file extension (case-insensitive)
    pub fn from_extension(extension: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.extension().eq_ignore_ascii_case(extension))
    }

    /// Folder name used when exporting assets of this kind
    pub const fn folder(self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Building => "building",
            Self::Texture => "texture",
        }
    }

    /// Human readable description
    pub const fn label(self) -> &'static str {
        match self {
            Self::Block => "Block File",
            Self::Building => "Building File",
            Self::Texture => "Texture File",
        }
    }

    /// Position in the legacy storage order (buildings, blocks, textures)
    pub(crate) const fn legacy_rank(self) -> u8 {
        match self {
            Self::Building => 1,
            Self::Block => 2,
            Self::Texture => 3,
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.folder())
    }
}

/// Material overlay attached to a texture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Material {
    /// Material name, stored in the texture sub-header
    pub name: String,
    /// Raw material bytes
    pub data: Vec<u8>,
}

impl Material {
    /// Create a new material
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

/// One asset stored in a CSX archive
///
/// Names never include the file extension. Only textures can carry a
/// material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Asset {
    /// Block definition
    Block {
        /// Asset name
        name: String,
        /// Raw block bytes
        data: Vec<u8>,
    },
    /// Building definition
    Building {
        /// Asset name
        name: String,
        /// Raw building bytes
        data: Vec<u8>,
    },
    /// Texture with an optional material
    Texture {
        /// Asset name
        name: String,
        /// Raw texture bytes
        data: Vec<u8>,
        /// Material overlay, if any
        material: Option<Material>,
    },
}

impl Asset {
    /// Create a block asset
    pub fn block(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self::Block {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Create a building asset
    pub fn building(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self::Building {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Create a texture asset without a material
    pub fn texture(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self::Texture {
            name: name.into(),
            data: data.into(),
            material: None,
        }
    }

    /// Create a texture asset carrying a material
    pub fn texture_with_material(
        name: impl Into<String>,
        data: impl Into<Vec<u8>>,
        material: Material,
    ) -> Self {
        Self::Texture {
            name: name.into(),
            data: data.into(),
            material: Some(material),
        }
    }

    /// Create an asset of the given kind
    pub fn new(kind: AssetKind, name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        match kind {
            AssetKind::Block => Self::block(name, data),
            AssetKind::Building => Self::building(name, data),
            AssetKind::Texture => Self::texture(name, data),
        }
    }

    /// Create an asset from a loose file name such as `rock.sbl`
    ///
    /// Returns `None` when the extension is missing or not one of the
    /// supported kinds.
    pub fn from_file_name(file_name: &str, data: impl Into<Vec<u8>>) -> Option<Self> {
        let (stem, extension) = file_name.rsplit_once('.')?;
        let kind = AssetKind::from_extension(extension)?;
        Some(Self::new(kind, stem, data))
    }

    /// Asset kind
    pub fn kind(&self) -> AssetKind {
        match self {
            Self::Block { .. } => AssetKind::Block,
            Self::Building { .. } => AssetKind::Building,
            Self::Texture { .. } => AssetKind::Texture,
        }
    }

    /// Asset name
    pub fn name(&self) -> &str {
        match self {
            Self::Block { name, .. } | Self::Building { name, .. } | Self::Texture { name, .. } => {
                name
            }
        }
    }

    /// Rename the asset
    pub fn set_name(&mut self, new_name: impl Into<String>) {
        match self {
            Self::Block { name, .. } | Self::Building { name, .. } | Self::Texture { name, .. } => {
                *name = new_name.into();
            }
        }
    }

    /// Primary payload (block, building or texture bytes)
    pub fn data(&self) -> &[u8] {
        match self {
            Self::Block { data, .. } | Self::Building { data, .. } | Self::Texture { data, .. } => {
                data
            }
        }
    }

    /// Material overlay, if this is a texture that has one
    pub fn material(&self) -> Option<&Material> {
        match self {
            Self::Texture { material, .. } => material.as_ref(),
            Self::Block { .. } | Self::Building { .. } => None,
        }
    }

    /// Mutable access to the material slot of a texture
    ///
    /// Returns `None` for blocks and buildings, which cannot carry a material.
    pub fn material_slot(&mut self) -> Option<&mut Option<Material>> {
        match self {
            Self::Texture { material, .. } => Some(material),
            Self::Block { .. } | Self::Building { .. } => None,
        }
    }

    /// Loose file name, e.g. `rock.sbl`
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.name(), self.kind().extension())
    }

    /// Number of bytes the asset occupies in the data region
    ///
    /// Textures add the 76-byte sub-header and the material bytes to their
    /// payload length.
    pub fn stored_len(&self) -> usize {
        match self {
            Self::Block { data, .. } | Self::Building { data, .. } => data.len(),
            Self::Texture { data, material, .. } => {
                TEXTURE_HEADER_SIZE + data.len() + material.as_ref().map_or(0, |m| m.data.len())
            }
        }
    }

    /// Total bytes of payload carried, including material bytes
    pub fn payload_len(&self) -> usize {
        self.data().len() + self.material().map_or(0, |m| m.data.len())
    }
}

/// Strip a trailing file extension from an asset name
///
/// Removes the last `.` and everything after it, provided the suffix is
/// non-empty and contains no path separator.
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(pos) if pos + 1 < name.len() && !name[pos + 1..].contains('/') => &name[..pos],
        _ => name,
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags() {
        for kind in AssetKind::ALL {
            assert_eq!(AssetKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(AssetKind::from_tag(0x03), None);
        assert_eq!(AssetKind::from_tag(0x00), None);
    }

    #[test]
    fn test_kind_words() {
        assert_eq!(AssetKind::Block.kind_word(), 0x0100_5A58);
        assert_eq!(AssetKind::Building.kind_word(), 0x0200_5A58);
        assert_eq!(AssetKind::Texture.kind_word(), 0x0400_5A58);
    }

    #[test]
    fn test_kind_extensions() {
        assert_eq!(AssetKind::from_extension("sbl"), Some(AssetKind::Block));
        assert_eq!(AssetKind::from_extension("SBB"), Some(AssetKind::Building));
        assert_eq!(AssetKind::from_extension("png"), Some(AssetKind::Texture));
        assert_eq!(AssetKind::from_extension("csx"), None);
        assert_eq!(AssetKind::from_extension(""), None);
    }

    #[test]
    fn test_from_file_name() {
        let asset = Asset::from_file_name("rock.sbl", vec![1, 2]).expect("Operation should succeed");
        assert_eq!(asset.kind(), AssetKind::Block);
        assert_eq!(asset.name(), "rock");
        assert_eq!(asset.file_name(), "rock.sbl");

        // Only the final extension is removed
        let asset = Asset::from_file_name("big.house.sbb", vec![]).expect("Operation should succeed");
        assert_eq!(asset.kind(), AssetKind::Building);
        assert_eq!(asset.name(), "big.house");

        assert!(Asset::from_file_name("notes.txt", vec![]).is_none());
        assert!(Asset::from_file_name("README", vec![]).is_none());
    }

    #[test]
    fn test_material_only_on_textures() {
        let mut block = Asset::block("rock", vec![1]);
        assert!(block.material().is_none());
        assert!(block.material_slot().is_none());

        let mut texture = Asset::texture("grass", vec![1, 2, 3]);
        *texture.material_slot().expect("Operation should succeed") =
            Some(Material::new("grass_mat", vec![9, 9]));
        assert_eq!(
            texture.material().map(|m| m.name.as_str()),
            Some("grass_mat")
        );
    }

    #[test]
    fn test_stored_len() {
        assert_eq!(Asset::block("a", vec![0; 10]).stored_len(), 10);
        assert_eq!(Asset::building("a", vec![0; 7]).stored_len(), 7);
        assert_eq!(Asset::texture("a", vec![0; 5]).stored_len(), 76 + 5);
        let textured =
            Asset::texture_with_material("a", vec![0; 5], Material::new("m", vec![0; 3]));
        assert_eq!(textured.stored_len(), 76 + 5 + 3);
        assert_eq!(textured.payload_len(), 8);
    }

    #[test]
    fn test_set_name() {
        let mut asset = Asset::texture("old", vec![]);
        asset.set_name("new");
        assert_eq!(asset.name(), "new");
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("rock.sbl"), "rock");
        assert_eq!(strip_extension("rock"), "rock");
        assert_eq!(strip_extension("a.b.png"), "a.b");
        assert_eq!(strip_extension("trailing."), "trailing.");
        assert_eq!(strip_extension("dir.v2/rock"), "dir.v2/rock");
        assert_eq!(strip_extension(".hidden"), "");
    }
}
