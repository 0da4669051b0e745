//! CSX file header parsing and building

use crate::csx::error::{CsxError, Result};
use crate::csx::{CSX_MAGIC, HEADER_SIZE, TABLE_ENTRY_SIZE};
use binrw::{BinRead, BinWrite};

/// CSX file header
///
/// The header is the first 12 bytes of every archive:
/// - Magic `0xC5F17E01` (4 bytes, little-endian)
/// - Absolute offset of the lookup table (4 bytes, little-endian)
/// - Number of 64-byte table entries (4 bytes, little-endian)
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct CsxHeader {
    /// Magic signature, `0xC5F17E01` in valid archives
    pub magic: u32,

    /// Absolute offset where the lookup table starts
    pub table_offset: u32,

    /// Number of entries in the lookup table
    pub entry_count: u32,
}

impl CsxHeader {
    /// Create a header for a table at `table_offset` holding `entry_count` entries
    pub fn new(table_offset: u32, entry_count: u32) -> Self {
        Self {
            magic: CSX_MAGIC,
            table_offset,
            entry_count,
        }
    }

    /// Validate the magic signature
    pub fn validate(&self) -> Result<()> {
        if self.magic != CSX_MAGIC {
            return Err(CsxError::MagicMismatch {
                expected: CSX_MAGIC,
                actual: self.magic,
            });
        }
        Ok(())
    }

    /// Size of the lookup table in bytes
    pub fn table_size(&self) -> u64 {
        u64::from(self.entry_count) * TABLE_ENTRY_SIZE as u64
    }

    /// Size of the data region between the header and the table
    ///
    /// Returns `None` when the table offset points into the header.
    pub fn data_size(&self) -> Option<u64> {
        u64::from(self.table_offset).checked_sub(HEADER_SIZE as u64)
    }
}
