//! Byte-level primitives shared by the CSX encoder and decoder
//!
//! Every helper works on a plain byte slice and an absolute offset. Reads past
//! the end of the input report [`CsxError::Truncated`]; writes past the end of
//! the output report [`CsxError::BufferOverflow`].

use crate::csx::error::{CsxError, Result};
use std::ops::Range;

/// Resolve `[offset, offset + len)` against a buffer of `available` bytes for reading
fn read_range(available: usize, offset: usize, len: usize) -> Result<Range<usize>> {
    match offset.checked_add(len) {
        Some(end) if end <= available => Ok(offset..end),
        _ => Err(CsxError::Truncated {
            offset: offset as u64,
            len: len as u64,
            available,
        }),
    }
}

/// Resolve `[offset, offset + len)` against a buffer of `capacity` bytes for writing
fn write_range(capacity: usize, offset: usize, len: usize) -> Result<Range<usize>> {
    match offset.checked_add(len) {
        Some(end) if end <= capacity => Ok(offset..end),
        _ => Err(CsxError::BufferOverflow {
            offset,
            len,
            capacity,
        }),
    }
}

/// Bounds-checked view of `len` bytes starting at `offset`
pub fn slice(buffer: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    let range = read_range(buffer.len(), offset, len)?;
    Ok(&buffer[range])
}

/// Read a single byte
pub fn read_u8(buffer: &[u8], offset: usize) -> Result<u8> {
    Ok(slice(buffer, offset, 1)?[0])
}

/// Read a little-endian `u32`
pub fn read_u32_le(buffer: &[u8], offset: usize) -> Result<u32> {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(slice(buffer, offset, 4)?);
    Ok(u32::from_le_bytes(bytes))
}

/// Write a little-endian `u32`
pub fn write_u32_le(buffer: &mut [u8], offset: usize, value: u32) -> Result<()> {
    copy_bytes(buffer, offset, &value.to_le_bytes())
}

/// Write a big-endian `u32`
///
/// Only the table entry kind word is stored this way.
pub fn write_u32_be(buffer: &mut [u8], offset: usize, value: u32) -> Result<()> {
    copy_bytes(buffer, offset, &value.to_be_bytes())
}

/// Copy `src` into `dst` starting at `dst_offset`
pub fn copy_bytes(dst: &mut [u8], dst_offset: usize, src: &[u8]) -> Result<()> {
    let range = write_range(dst.len(), dst_offset, src.len())?;
    dst[range].copy_from_slice(src);
    Ok(())
}

/// Write `value` into a fixed-width, zero-padded field
///
/// Strings longer than the field are truncated without error. Truncation
/// backs off to the nearest character boundary so the stored bytes stay valid
/// UTF-8. Bytes of the field past the string are zeroed.
pub fn write_fixed_string(
    buffer: &mut [u8],
    offset: usize,
    value: &str,
    field_len: usize,
) -> Result<()> {
    let range = write_range(buffer.len(), offset, field_len)?;
    let field = &mut buffer[range];

    let mut len = value.len().min(field_len);
    while !value.is_char_boundary(len) {
        len -= 1;
    }

    field[..len].copy_from_slice(&value.as_bytes()[..len]);
    field[len..].fill(0);
    Ok(())
}

/// Read a zero-terminated string from a fixed-width field
///
/// Reading stops at the first zero byte or at the end of the field. Invalid
/// UTF-8 is replaced rather than rejected.
pub fn read_fixed_string(buffer: &[u8], offset: usize, field_len: usize) -> Result<String> {
    let field = slice(buffer, offset, field_len)?;
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    Ok(String::from_utf8_lossy(&field[..end]).into_owned())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_u32_le_round_trip() {
        let mut buffer = [0u8; 8];
        write_u32_le(&mut buffer, 2, 0xC5F1_7E01).expect("Operation should succeed");
        assert_eq!(buffer, [0, 0, 0x01, 0x7E, 0xF1, 0xC5, 0, 0]);
        assert_eq!(
            read_u32_le(&buffer, 2).expect("Operation should succeed"),
            0xC5F1_7E01
        );
    }

    #[test]
    fn test_u32_be_puts_high_byte_first() {
        let mut buffer = [0u8; 4];
        write_u32_be(&mut buffer, 0, 0x0400_5A58).expect("Operation should succeed");
        assert_eq!(buffer, [0x04, 0x00, 0x5A, 0x58]);
        assert_eq!(read_u8(&buffer, 0).expect("Operation should succeed"), 0x04);
    }

    #[test]
    fn test_fixed_string_padding() {
        let mut buffer = [0xFFu8; 10];
        write_fixed_string(&mut buffer, 1, "rock", 8).expect("Operation should succeed");
        assert_eq!(buffer, [0xFF, b'r', b'o', b'c', b'k', 0, 0, 0, 0, 0xFF]);
        assert_eq!(
            read_fixed_string(&buffer, 1, 8).expect("Operation should succeed"),
            "rock"
        );
    }

    #[test]
    fn test_fixed_string_truncation() {
        let mut buffer = [0u8; 4];
        write_fixed_string(&mut buffer, 0, "abcdefgh", 4).expect("Operation should succeed");
        assert_eq!(&buffer, b"abcd");
        // No terminator: the whole field is the string
        assert_eq!(
            read_fixed_string(&buffer, 0, 4).expect("Operation should succeed"),
            "abcd"
        );
    }

    #[test]
    fn test_fixed_string_truncation_respects_char_boundary() {
        let mut buffer = [0u8; 4];
        // 'é' is two bytes; the second one would land past the field
        write_fixed_string(&mut buffer, 0, "abcé", 4).expect("Operation should succeed");
        assert_eq!(&buffer, b"abc\0");
    }

    #[test]
    fn test_copy_bytes_overflow() {
        let mut buffer = [0u8; 4];
        let result = copy_bytes(&mut buffer, 2, &[1, 2, 3]);
        assert!(matches!(
            result,
            Err(CsxError::BufferOverflow {
                offset: 2,
                len: 3,
                capacity: 4
            })
        ));
        // Nothing written on failure
        assert_eq!(buffer, [0u8; 4]);
    }

    #[test]
    fn test_reads_past_end_are_truncated() {
        let buffer = [0u8; 6];
        assert!(matches!(
            read_u32_le(&buffer, 4),
            Err(CsxError::Truncated { offset: 4, len: 4, .. })
        ));
        assert!(matches!(
            read_u8(&buffer, 6),
            Err(CsxError::Truncated { .. })
        ));
        assert!(matches!(
            slice(&buffer, usize::MAX, 2),
            Err(CsxError::Truncated { .. })
        ));
    }
}
