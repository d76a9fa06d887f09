//! Primary header reading and payload encoding detection

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::{PRIMARY_HEADER_LEN, PayloadEncoding};
use crate::error::{Error, Result};

/// Offset of the first zlib header byte (CMF) in the primary header
const ZLIB_CMF_OFFSET: usize = 0x10;

/// Offset of the second zlib header byte (FLG) in the primary header
const ZLIB_FLG_OFFSET: usize = 0x11;

/// Deflate with a 32K window
const ZLIB_CMF: u8 = 0x78;

/// FLG bytes for the fastest, default and best compression levels
const ZLIB_FLG: [u8; 3] = [0x01, 0x9C, 0xDA];

/// Classify the payload encoding from the first 32 bytes of an archive.
///
/// This is a guess: the bytes at 0x10 are compared against the zlib stream
/// headers seen in practice. A wrong guess shows up later as a
/// decompression or directory error.
pub fn probe(header: &[u8]) -> Result<PayloadEncoding> {
    if header.len() < PRIMARY_HEADER_LEN {
        return Err(Error::TruncatedHeader {
            path: Path::new("<memory>").to_path_buf(),
            expected: PRIMARY_HEADER_LEN as u64,
            found: header.len() as u64,
        });
    }

    let cmf = header[ZLIB_CMF_OFFSET];
    let flg = header[ZLIB_FLG_OFFSET];

    if cmf == ZLIB_CMF && ZLIB_FLG.contains(&flg) {
        Ok(PayloadEncoding::Zlib)
    } else {
        Ok(PayloadEncoding::Raw)
    }
}

/// Read the primary header from the start of an archive file.
pub fn read_primary_header(path: &Path) -> Result<[u8; PRIMARY_HEADER_LEN]> {
    let file = File::open(path)?;

    let mut bytes = Vec::with_capacity(PRIMARY_HEADER_LEN);
    file.take(PRIMARY_HEADER_LEN as u64).read_to_end(&mut bytes)?;

    bytes.try_into().map_err(|short: Vec<u8>| Error::TruncatedHeader {
        path: path.to_path_buf(),
        expected: PRIMARY_HEADER_LEN as u64,
        found: short.len() as u64,
    })
}

/// Read the primary header of `path` and classify its payload encoding.
pub fn detect_encoding(path: &Path) -> Result<PayloadEncoding> {
    let header = read_primary_header(path)?;
    probe(&header)
}
