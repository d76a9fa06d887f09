//! Forward-only cursor over the post-header region of an archive

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use flate2::bufread::ZlibDecoder;

use super::{PAYLOAD_START, PayloadEncoding};
use crate::error::{Error, Result};

/// Upper bound for the initial allocation of a single read
const READ_RESERVE_LIMIT: u64 = 1 << 20;

enum Source {
    Raw(BufReader<File>),
    Zlib(ZlibDecoder<BufReader<File>>),
}

/// A byte cursor over everything after the first 0x10 bytes of an archive.
///
/// When the archive is zlib-compressed the cursor inflates on the fly, so it
/// can only move forward: there is no seek and no rewind. [`refresh`](Self::refresh)
/// reopens the file and starts again at position 0. The file handle is closed
/// when the stream is dropped.
pub struct PayloadStream {
    path: PathBuf,
    encoding: PayloadEncoding,
    source: Option<Source>,
    position: u64,
}

impl PayloadStream {
    /// Open `path` and position the cursor at the start of the payload region.
    pub fn open(path: impl AsRef<Path>, encoding: PayloadEncoding) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let source = open_source(&path, encoding)?;

        Ok(Self {
            path,
            encoding,
            source: Some(source),
            position: 0,
        })
    }

    /// Close the current handle and reopen the archive from the start.
    pub fn refresh(&mut self) -> Result<()> {
        tracing::debug!(
            "Refreshing payload stream for {} (was at {})",
            self.path.display(),
            self.position
        );
        self.source = None;
        self.position = 0;
        self.source = Some(open_source(&self.path, self.encoding)?);
        Ok(())
    }

    /// Bytes consumed since the stream was opened or last refreshed.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn encoding(&self) -> PayloadEncoding {
        self.encoding
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Discard exactly `n` bytes.
    pub fn skip(&mut self, n: u64) -> Result<()> {
        if n == 0 {
            return Ok(());
        }

        let start = self.position;
        let result = io::copy(&mut self.reader()?.take(n), &mut io::sink());
        let skipped = result.map_err(|e| self.read_error(e, start, n))?;
        self.position += skipped;

        if skipped < n {
            return Err(self.eof_error(start, n, skipped));
        }
        Ok(())
    }

    /// Read exactly `n` bytes.
    pub fn read_exactly(&mut self, n: u64) -> Result<Vec<u8>> {
        let start = self.position;
        let mut buf = Vec::with_capacity(n.min(READ_RESERVE_LIMIT) as usize);
        let result = self.reader()?.take(n).read_to_end(&mut buf);
        let read = result.map_err(|e| self.read_error(e, start, n))? as u64;
        self.position += read;

        if read < n {
            return Err(self.eof_error(start, n, read));
        }
        Ok(buf)
    }

    fn reader(&mut self) -> io::Result<&mut dyn Read> {
        match self.source.as_mut() {
            Some(Source::Raw(reader)) => Ok(reader),
            Some(Source::Zlib(decoder)) => Ok(decoder),
            None => Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "payload stream is closed",
            )),
        }
    }

    fn eof_error(&self, offset: u64, requested: u64, available: u64) -> Error {
        Error::UnexpectedEof {
            path: self.path.clone(),
            offset,
            requested,
            available,
        }
    }

    fn read_error(&self, err: io::Error, offset: u64, requested: u64) -> Error {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => self.eof_error(offset, requested, 0),
            io::ErrorKind::InvalidInput | io::ErrorKind::InvalidData
                if self.encoding.is_compressed() =>
            {
                Error::DecompressionFailure {
                    path: self.path.clone(),
                    offset,
                    message: err.to_string(),
                }
            }
            _ => Error::Io(err),
        }
    }
}

fn open_source(path: &Path, encoding: PayloadEncoding) -> Result<Source> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::Start(PAYLOAD_START))?;
    let reader = BufReader::new(file);

    Ok(match encoding {
        PayloadEncoding::Raw => Source::Raw(reader),
        PayloadEncoding::Zlib => Source::Zlib(ZlibDecoder::new(reader)),
    })
}
