//! Error types for CSX archive parsing and building

use thiserror::Error;

/// Errors that can occur when parsing or building CSX archives
#[derive(Error, Debug)]
pub enum CsxError {
    /// Header magic does not identify a CSX archive
    #[error("Invalid CSX magic: expected {expected:#010x}, got {actual:#010x}")]
    MagicMismatch {
        /// Magic value every CSX archive starts with
        expected: u32,
        /// Value found at offset 0
        actual: u32,
    },

    /// A read or slice reaches past the end of the input
    #[error(
        "Truncated archive: {len} bytes at offset {offset} exceed buffer of {available} bytes"
    )]
    Truncated {
        /// Start of the requested range
        offset: u64,
        /// Length of the requested range
        len: u64,
        /// Length of the buffer
        available: usize,
    },

    /// A write reaches past the end of the output buffer
    #[error("Buffer overflow: {len} bytes at offset {offset} exceed buffer of {capacity} bytes")]
    BufferOverflow {
        /// Start of the attempted write
        offset: usize,
        /// Length of the attempted write
        len: usize,
        /// Length of the output buffer
        capacity: usize,
    },

    /// Archive layout does not fit the 32-bit offset fields
    #[error("Archive too large: {0} bytes exceeds the 32-bit offset space")]
    ArchiveTooLarge(u64),

    /// A table entry does not start where the previous one ended
    #[error("Layout mismatch at entry {index}: expected offset {expected}, found {actual}")]
    LayoutMismatch {
        /// Index of the offending table entry (or the entry count for the table itself)
        index: usize,
        /// Offset implied by the preceding data
        expected: u64,
        /// Offset recorded in the archive
        actual: u64,
    },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// `BinRW` parsing/writing error
    #[error("Binary format error: {0}")]
    BinRw(#[from] binrw::Error),
}

/// Type alias for CSX operation results
pub type Result<T> = std::result::Result<T, CsxError>;
