//! Secondary header and directory table parsing

use std::io::Cursor;
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};

use super::names::read_names;
use super::stream::PayloadStream;
use super::{Addressing, Entry, FILE_RECORD_LEN, SECONDARY_HEADER_LEN};
use crate::error::{Error, Result};

/// The fixed block at the start of the post-header region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecondaryHeader {
    /// Offset of the name-location table
    pub name_table_offset: u32,
    /// Number of entries in the archive
    pub file_count: u32,
    /// Offset of the file location/length table
    pub file_table_offset: u32,
}

impl SecondaryHeader {
    /// Parse the header from its 0x30 bytes. Fields other than the three
    /// offsets/counts are reserved and ignored.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(bytes);
        let name_table_offset = cursor.read_u32::<LittleEndian>()?;
        let file_count = cursor.read_u32::<LittleEndian>()?;
        cursor.set_position(0x10);
        let file_table_offset = cursor.read_u32::<LittleEndian>()?;

        Ok(Self {
            name_table_offset,
            file_count,
            file_table_offset,
        })
    }

    /// Total length of the directory: everything up to the end of the file table.
    pub fn descriptor_len(&self) -> u64 {
        u64::from(self.file_table_offset) + u64::from(self.file_count) * FILE_RECORD_LEN as u64
    }
}

/// The parsed directory of an archive
#[derive(Debug, Clone)]
pub struct Directory {
    pub header: SecondaryHeader,
    /// Entries in directory order
    pub entries: Vec<Entry>,
    /// Stream offset that entry locations are relative to
    pub payload_base: u64,
}

impl Directory {
    pub fn descriptor_len(&self) -> u64 {
        self.header.descriptor_len()
    }
}

/// Read the directory from the head of a freshly opened payload stream.
pub fn read_directory(stream: &mut PayloadStream, addressing: Addressing) -> Result<Directory> {
    let archive = stream.path().to_path_buf();

    let mut buffer = stream
        .read_exactly(SECONDARY_HEADER_LEN as u64)
        .map_err(|e| match e {
            Error::UnexpectedEof { available, .. } => Error::TruncatedHeader {
                path: archive.clone(),
                expected: SECONDARY_HEADER_LEN as u64,
                found: available,
            },
            other => other,
        })?;

    let header = SecondaryHeader::parse(&buffer)?;
    let descriptor_len = header.descriptor_len();
    if descriptor_len < SECONDARY_HEADER_LEN as u64 {
        return Err(Error::malformed(
            &archive,
            format!("directory length {descriptor_len} is shorter than its own header"),
        ));
    }

    tracing::debug!(
        "Secondary header: {} entries, name table at 0x{:X}, file table at 0x{:X}",
        header.file_count,
        header.name_table_offset,
        header.file_table_offset
    );

    let rest = stream
        .read_exactly(descriptor_len - SECONDARY_HEADER_LEN as u64)
        .map_err(|e| match e {
            Error::UnexpectedEof { available, .. } => Error::TruncatedArchive {
                path: archive.clone(),
                expected: descriptor_len,
                found: SECONDARY_HEADER_LEN as u64 + available,
            },
            other => other,
        })?;
    buffer.extend(rest);

    parse_directory(&buffer, &archive, addressing)
}

/// Parse a complete directory buffer (secondary header plus tables).
pub fn parse_directory(buffer: &[u8], archive: &Path, addressing: Addressing) -> Result<Directory> {
    if buffer.len() < SECONDARY_HEADER_LEN {
        return Err(Error::TruncatedHeader {
            path: archive.to_path_buf(),
            expected: SECONDARY_HEADER_LEN as u64,
            found: buffer.len() as u64,
        });
    }

    let header = SecondaryHeader::parse(&buffer[..SECONDARY_HEADER_LEN])?;
    let names = read_names(buffer, header.name_table_offset, header.file_count, archive)?;
    let spans = read_file_table(buffer, &header, archive)?;

    let entries: Vec<Entry> = names
        .into_iter()
        .zip(spans)
        .enumerate()
        .map(|(index, (name, (location, length)))| Entry {
            index,
            name,
            location,
            length,
        })
        .collect();

    let payload_base = resolve_payload_base(header.descriptor_len(), addressing);

    Ok(Directory {
        header,
        entries,
        payload_base,
    })
}

/// Read `(location, length)` pairs; the trailing 8 bytes of each record are reserved.
fn read_file_table(buffer: &[u8], header: &SecondaryHeader, archive: &Path) -> Result<Vec<(u32, u32)>> {
    let start = header.file_table_offset as usize;
    let end = usize::try_from(header.descriptor_len())
        .ok()
        .filter(|&end| end <= buffer.len())
        .ok_or_else(|| {
            Error::malformed(
                archive,
                format!(
                    "file table at 0x{start:X} ({} records) exceeds directory of {} bytes",
                    header.file_count,
                    buffer.len()
                ),
            )
        })?;

    let mut cursor = Cursor::new(&buffer[start..end]);
    let mut spans = Vec::with_capacity(header.file_count as usize);
    for _ in 0..header.file_count {
        let location = cursor.read_u32::<LittleEndian>()?;
        let length = cursor.read_u32::<LittleEndian>()?;
        let _reserved = cursor.read_u64::<LittleEndian>()?;
        spans.push((location, length));
    }

    Ok(spans)
}

/// Stream offset that entry locations count from.
pub fn resolve_payload_base(descriptor_len: u64, addressing: Addressing) -> u64 {
    match addressing {
        Addressing::AfterDirectory => descriptor_len,
        Addressing::StreamStart => 0,
    }
}
