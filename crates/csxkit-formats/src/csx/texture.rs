//! Texture sub-header parsing and building

use crate::csx::codec;
use crate::csx::error::Result;
use crate::csx::{MATERIAL_NAME_SIZE, TEXTURE_HEADER_SIZE};

/// Value of the leading marker field
pub const TEXTURE_MARKER: u32 = 1;

const MATERIAL_NAME_FIELD: usize = 0x04;
const TEXTURE_LEN_FIELD: usize = 0x44;
const MATERIAL_LEN_FIELD: usize = 0x48;

/// 76-byte prefix written in front of every texture payload
///
/// Layout (all integers little-endian):
/// - `0x00` marker, always 1
/// - `0x04` material name, 64 bytes zero padded (empty without a material)
/// - `0x44` texture length
/// - `0x48` material length (0 without a material)
///
/// Texture bytes follow at `0x4C`, material bytes directly after them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureHeader {
    /// Leading marker field
    pub marker: u32,
    /// Material name, empty when the texture has no material
    pub material_name: String,
    /// Length of the texture payload
    pub texture_len: u32,
    /// Length of the material payload
    pub material_len: u32,
}

impl TextureHeader {
    /// Create a sub-header describing the given payload lengths
    pub fn new(material_name: impl Into<String>, texture_len: u32, material_len: u32) -> Self {
        Self {
            marker: TEXTURE_MARKER,
            material_name: material_name.into(),
            texture_len,
            material_len,
        }
    }

    /// Parse the sub-header stored at `at`
    pub fn parse(data: &[u8], at: usize) -> Result<Self> {
        let record = codec::slice(data, at, TEXTURE_HEADER_SIZE)?;
        Ok(Self {
            marker: codec::read_u32_le(record, 0)?,
            material_name: codec::read_fixed_string(record, MATERIAL_NAME_FIELD, MATERIAL_NAME_SIZE)?,
            texture_len: codec::read_u32_le(record, TEXTURE_LEN_FIELD)?,
            material_len: codec::read_u32_le(record, MATERIAL_LEN_FIELD)?,
        })
    }

    /// Write the sub-header into `buffer` at `at`
    pub fn write(&self, buffer: &mut [u8], at: usize) -> Result<()> {
        let mut record = [0u8; TEXTURE_HEADER_SIZE];
        codec::write_u32_le(&mut record, 0, self.marker)?;
        codec::write_fixed_string(
            &mut record,
            MATERIAL_NAME_FIELD,
            &self.material_name,
            MATERIAL_NAME_SIZE,
        )?;
        codec::write_u32_le(&mut record, TEXTURE_LEN_FIELD, self.texture_len)?;
        codec::write_u32_le(&mut record, MATERIAL_LEN_FIELD, self.material_len)?;
        codec::copy_bytes(buffer, at, &record)
    }

    /// Bytes occupied by the sub-header and both payloads
    pub fn footprint(&self) -> u64 {
        TEXTURE_HEADER_SIZE as u64 + u64::from(self.texture_len) + u64::from(self.material_len)
    }
}
