//! Lookup table entry parsing and building

use crate::csx::asset::AssetKind;
use crate::csx::codec;
use crate::csx::error::Result;
use crate::csx::{TABLE_ENTRY_SIZE, TABLE_NAME_SIZE};

/// Offset of the data offset field inside an entry
const OFFSET_FIELD: usize = 4;
/// Offset of the size field inside an entry
const SIZE_FIELD: usize = 8;
/// Offset of the name field inside an entry
const NAME_FIELD: usize = 12;

/// One 64-byte record of the lookup table
///
/// Layout:
/// - Kind word (4 bytes, big-endian): tag byte followed by `00 5A 58`
/// - Data offset (4 bytes, little-endian), absolute from the start of the file
/// - Size (4 bytes, little-endian); for textures this is the texture length only
/// - Name (52 bytes, zero padded)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEntry {
    /// Kind tag byte (`0x01` block, `0x02` building, `0x04` texture)
    pub tag: u8,
    /// Remaining three bytes of the kind word
    pub marker: [u8; 3],
    /// Absolute offset of the asset data
    pub offset: u32,
    /// Size field as stored in the table
    pub size: u32,
    /// Asset name without extension
    pub name: String,
}

impl TableEntry {
    /// Create an entry for an asset of `kind`
    pub fn new(kind: AssetKind, offset: u32, size: u32, name: impl Into<String>) -> Self {
        let [tag, marker @ ..] = kind.kind_word().to_be_bytes();
        Self {
            tag,
            marker,
            offset,
            size,
            name: name.into(),
        }
    }

    /// Asset kind, or `None` for an unrecognized tag
    pub fn kind(&self) -> Option<AssetKind> {
        AssetKind::from_tag(self.tag)
    }

    /// Full kind word as stored on disk
    pub fn kind_word(&self) -> u32 {
        let [a, b, c] = self.marker;
        u32::from_be_bytes([self.tag, a, b, c])
    }

    /// Parse the entry stored at `at`
    pub fn parse(data: &[u8], at: usize) -> Result<Self> {
        let record = codec::slice(data, at, TABLE_ENTRY_SIZE)?;

        let tag = codec::read_u8(record, 0)?;
        let mut marker = [0u8; 3];
        marker.copy_from_slice(codec::slice(record, 1, 3)?);

        Ok(Self {
            tag,
            marker,
            offset: codec::read_u32_le(record, OFFSET_FIELD)?,
            size: codec::read_u32_le(record, SIZE_FIELD)?,
            name: codec::read_fixed_string(record, NAME_FIELD, TABLE_NAME_SIZE)?,
        })
    }

    /// Write the entry into `buffer` at `at`
    ///
    /// Names longer than the 52-byte field are truncated.
    pub fn write(&self, buffer: &mut [u8], at: usize) -> Result<()> {
        let mut record = [0u8; TABLE_ENTRY_SIZE];
        codec::write_u32_be(&mut record, 0, self.kind_word())?;
        codec::write_u32_le(&mut record, OFFSET_FIELD, self.offset)?;
        codec::write_u32_le(&mut record, SIZE_FIELD, self.size)?;
        codec::write_fixed_string(&mut record, NAME_FIELD, &self.name, TABLE_NAME_SIZE)?;
        codec::copy_bytes(buffer, at, &record)
    }
}
