//! Synthetic archive builder shared by the integration tests

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, WriteBytesExt};
use flate2::Compression;
use flate2::write::ZlibEncoder;

/// Size of the skipped part of the primary header
pub const HEADER_SKIP: usize = 0x10;
pub const SECONDARY_HEADER_LEN: u32 = 0x30;

struct FixtureEntry {
    name: String,
    data: Vec<u8>,
    /// `None` writes the 0 sentinel and places the data right after the previous entry
    location: Option<u32>,
}

/// Builds archive files entry by entry.
///
/// Locations given to [`ArchiveBuilder::entry_at`] are payload-relative
/// (0 = first byte after the directory). With [`ArchiveBuilder::stream_addressed`]
/// the builder stores them shifted by the directory length instead.
pub struct ArchiveBuilder {
    entries: Vec<FixtureEntry>,
    compression: Option<Compression>,
    stream_addressed: bool,
}

/// A built archive and what each entry should extract to.
pub struct BuiltArchive {
    pub bytes: Vec<u8>,
    /// Directory length (secondary header + tables + names)
    pub descriptor_len: u32,
    /// Offset of the file table in the post-header stream
    pub file_table_offset: u32,
    pub expected: Vec<(String, Vec<u8>)>,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            compression: None,
            stream_addressed: false,
        }
    }

    /// Add an entry stored with the 0 sentinel (directly after the previous one).
    pub fn entry(mut self, name: &str, data: &[u8]) -> Self {
        self.entries.push(FixtureEntry {
            name: name.to_string(),
            data: data.to_vec(),
            location: None,
        });
        self
    }

    /// Add an entry at an explicit payload-relative location.
    pub fn entry_at(mut self, name: &str, data: &[u8], location: u32) -> Self {
        self.entries.push(FixtureEntry {
            name: name.to_string(),
            data: data.to_vec(),
            location: Some(location),
        });
        self
    }

    pub fn compressed(mut self, level: Compression) -> Self {
        self.compression = Some(level);
        self
    }

    /// Store locations as offsets from the start of the post-header stream.
    pub fn stream_addressed(mut self) -> Self {
        self.stream_addressed = true;
        self
    }

    pub fn build(&self) -> BuiltArchive {
        let count = self.entries.len() as u32;
        let name_table = SECONDARY_HEADER_LEN;
        let names_start = name_table + count * 8;
        let names_len: u32 = self.entries.iter().map(|e| e.name.len() as u32 + 1).sum();
        let file_table = names_start + names_len;
        let descriptor_len = file_table + count * 16;
        let shift = if self.stream_addressed { descriptor_len } else { 0 };

        // payload and the (location, length) pairs that describe it
        let mut payload = Vec::new();
        let mut spans = Vec::new();
        for (i, entry) in self.entries.iter().enumerate() {
            let stored = match entry.location {
                Some(location) => {
                    assert!(location as usize >= payload.len(), "entries must not overlap");
                    payload.resize(location as usize, 0xCC);
                    location + shift
                }
                None if i == 0 => shift,
                None => 0,
            };
            payload.extend_from_slice(&entry.data);
            spans.push((stored, entry.data.len() as u32));
        }

        let mut stream = Vec::new();
        stream.write_u32::<LittleEndian>(name_table).unwrap();
        stream.write_u32::<LittleEndian>(count).unwrap();
        stream.extend_from_slice(&[0x5A; 8]);
        stream.write_u32::<LittleEndian>(file_table).unwrap();
        stream.write_u32::<LittleEndian>(count).unwrap();
        stream.resize(SECONDARY_HEADER_LEN as usize, 0);

        let mut name_offset = names_start;
        for entry in &self.entries {
            stream.write_u32::<LittleEndian>(name_offset).unwrap();
            stream.write_u32::<LittleEndian>(0xA5A5_A5A5).unwrap();
            name_offset += entry.name.len() as u32 + 1;
        }
        for entry in &self.entries {
            stream.extend_from_slice(entry.name.as_bytes());
            stream.push(0);
        }
        for &(location, length) in &spans {
            stream.write_u32::<LittleEndian>(location).unwrap();
            stream.write_u32::<LittleEndian>(length).unwrap();
            stream.write_u64::<LittleEndian>(0x1122_3344_5566_7788).unwrap();
        }
        assert_eq!(stream.len(), descriptor_len as usize);
        stream.extend_from_slice(&payload);

        let mut bytes = b"VRFs\0\0PC".to_vec();
        bytes.resize(HEADER_SKIP, 0);
        match self.compression {
            Some(level) => {
                let mut encoder = ZlibEncoder::new(Vec::new(), level);
                encoder.write_all(&stream).unwrap();
                bytes.extend(encoder.finish().unwrap());
            }
            None => bytes.extend(stream),
        }

        BuiltArchive {
            bytes,
            descriptor_len,
            file_table_offset: file_table,
            expected: self
                .entries
                .iter()
                .map(|e| (e.name.clone(), e.data.clone()))
                .collect(),
        }
    }
}

impl BuiltArchive {
    pub fn write_to(&self, dir: &Path, file_name: &str) -> PathBuf {
        let path = dir.join(file_name);
        std::fs::write(&path, &self.bytes).unwrap();
        path
    }

    /// File offset of a u32 field in the file table of an uncompressed archive.
    pub fn file_table_field(&self, index: usize, field: usize) -> usize {
        HEADER_SKIP + self.file_table_offset as usize + index * 16 + field * 4
    }

    /// Overwrite a u32 at `offset` (uncompressed archives only).
    pub fn patch_u32(&mut self, offset: usize, value: u32) {
        self.bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
    }
}

/// The two-entry archive from the format notes: "a.txt" and "b/c.txt",
/// both stored with location 0.
pub fn hello_archive() -> ArchiveBuilder {
    ArchiveBuilder::new()
        .entry("a.txt", b"hello")
        .entry("b/c.txt", b"hi!")
}

/// Route library logs to the test harness output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Number of files below `dir`, recursively.
pub fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .map(|p| if p.is_dir() { count_files(&p) } else { 1 })
        .sum()
}
