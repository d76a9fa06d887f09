//! Name-location table and null-terminated name resolution

use std::io::Cursor;
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};

use super::NAME_RECORD_LEN;
use crate::error::{Error, Result};

/// Read `count` name offsets from the name-location table at `table_offset`.
///
/// Each record is a `u32` offset followed by 4 reserved bytes.
pub fn read_name_offsets(
    buffer: &[u8],
    table_offset: u32,
    count: u32,
    archive: &Path,
) -> Result<Vec<u32>> {
    let start = table_offset as usize;
    let table_len = (count as usize)
        .checked_mul(NAME_RECORD_LEN)
        .ok_or_else(|| Error::malformed(archive, format!("name table for {count} entries overflows")))?;
    let end = start
        .checked_add(table_len)
        .filter(|&end| end <= buffer.len())
        .ok_or_else(|| {
            Error::malformed(
                archive,
                format!(
                    "name table at 0x{start:X} ({count} records) exceeds directory of {} bytes",
                    buffer.len()
                ),
            )
        })?;

    let mut cursor = Cursor::new(&buffer[start..end]);
    let mut offsets = Vec::with_capacity(count as usize);
    for _ in 0..count {
        offsets.push(cursor.read_u32::<LittleEndian>()?);
        let _reserved = cursor.read_u32::<LittleEndian>()?;
    }

    Ok(offsets)
}

/// Read the null-terminated name starting at `offset`.
pub fn read_name(buffer: &[u8], offset: u32, archive: &Path) -> Result<String> {
    let start = offset as usize;
    let tail = buffer.get(start..).filter(|t| !t.is_empty()).ok_or_else(|| {
        Error::malformed(
            archive,
            format!("name offset 0x{start:X} outside directory of {} bytes", buffer.len()),
        )
    })?;

    let len = tail.iter().position(|&b| b == 0).ok_or_else(|| {
        Error::malformed(archive, format!("name at 0x{start:X} is not null-terminated"))
    })?;

    Ok(String::from_utf8_lossy(&tail[..len]).into_owned())
}

/// Resolve every name in the name-location table, in table order.
pub fn read_names(buffer: &[u8], table_offset: u32, count: u32, archive: &Path) -> Result<Vec<String>> {
    read_name_offsets(buffer, table_offset, count, archive)?
        .into_iter()
        .map(|offset| read_name(buffer, offset, archive))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn archive() -> &'static Path {
        Path::new("test.bin")
    }

    #[test]
    fn test_read_names_in_table_order() {
        // table at 0, names at 16
        let mut buffer = Vec::new();
        buffer.extend_from_slice(&22u32.to_le_bytes());
        buffer.extend_from_slice(&[0xAA; 4]);
        buffer.extend_from_slice(&16u32.to_le_bytes());
        buffer.extend_from_slice(&[0xBB; 4]);
        buffer.extend_from_slice(b"a.txt\0b/c.txt\0");

        let names = read_names(&buffer, 0, 2, archive()).unwrap();
        assert_eq!(names, vec!["b/c.txt".to_string(), "a.txt".to_string()]);
    }

    #[test]
    fn test_read_name_missing_terminator() {
        let err = read_name(b"abc", 0, archive()).unwrap_err();
        assert!(matches!(err, Error::MalformedDirectory { .. }));
    }

    #[test]
    fn test_read_name_out_of_bounds() {
        let err = read_name(b"abc\0", 4, archive()).unwrap_err();
        assert!(matches!(err, Error::MalformedDirectory { .. }));
        let err = read_name(b"abc\0", 400, archive()).unwrap_err();
        assert!(matches!(err, Error::MalformedDirectory { .. }));
    }

    #[test]
    fn test_name_table_past_buffer() {
        let err = read_name_offsets(&[0u8; 12], 8, 1, archive()).unwrap_err();
        assert!(matches!(err, Error::MalformedDirectory { .. }));
    }

    #[test]
    fn test_empty_name_is_allowed() {
        assert_eq!(read_name(b"\0", 0, archive()).unwrap(), "");
    }
}
