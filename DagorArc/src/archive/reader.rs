//! Dagor archive handle: directory parsing on open, extraction on demand

use std::path::{Path, PathBuf};

use super::directory::{Directory, read_directory};
use super::extractor::{EntryReader, Extractor, ProgressCallback};
use super::header::detect_encoding;
use super::stream::PayloadStream;
use super::{Addressing, Entry, ExtractOptions, ExtractionSummary, PayloadEncoding};
use crate::error::Result;

/// Capabilities shared by every supported archive layout.
///
/// Front ends should program against this trait so that further container
/// variants can be added next to [`DagorArchive`].
pub trait AssetArchive {
    /// Entry names in directory order.
    fn list_names(&self) -> Vec<&str>;

    /// Extract every entry below `dest`.
    fn extract_all(&self, dest: &Path) -> Result<ExtractionSummary>;

    /// Extract a single entry by exact name. Returns `Ok(None)` and writes
    /// nothing when the archive has no entry with that name.
    fn extract(&self, name: &str, dest: &Path) -> Result<Option<PathBuf>>;
}

/// An opened Dagor asset archive.
///
/// Opening reads the primary header and the directory; no file handle is
/// kept afterwards. Every extraction call opens its own payload stream and
/// closes it before returning.
///
/// # Example
///
/// ```no_run
/// use dagorarc::archive::DagorArchive;
///
/// let archive = DagorArchive::open("char.vromfs.bin")?;
/// for name in archive.list_names() {
///     println!("{name}");
/// }
/// archive.extract_all("out/")?;
/// # Ok::<(), dagorarc::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct DagorArchive {
    path: PathBuf,
    encoding: PayloadEncoding,
    directory: Directory,
}

impl DagorArchive {
    /// Open an archive whose entry locations count from the end of the directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_addressing(path, Addressing::AfterDirectory)
    }

    /// Open an archive with an explicit location addressing mode.
    ///
    /// Use [`Addressing::StreamStart`] for archives that store locations as
    /// offsets from the start of the post-header stream.
    pub fn open_with_addressing(path: impl AsRef<Path>, addressing: Addressing) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        tracing::debug!("Opening archive: {}", path.display());

        let encoding = detect_encoding(&path)?;
        tracing::debug!("Archive payload encoding: {}", encoding.as_str());

        let directory = {
            let mut stream = PayloadStream::open(&path, encoding)?;
            read_directory(&mut stream, addressing)?
        };

        tracing::info!(
            "Opened {} ({}, {} entries, payload base {})",
            path.display(),
            encoding.as_str(),
            directory.entries.len(),
            directory.payload_base
        );

        Ok(Self {
            path,
            encoding,
            directory,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn encoding(&self) -> PayloadEncoding {
        self.encoding
    }

    pub fn is_compressed(&self) -> bool {
        self.encoding.is_compressed()
    }

    /// Entries in directory order
    pub fn entries(&self) -> &[Entry] {
        &self.directory.entries
    }

    pub fn len(&self) -> usize {
        self.directory.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directory.entries.is_empty()
    }

    /// Length of the directory at the head of the post-header stream
    pub fn descriptor_len(&self) -> u64 {
        self.directory.descriptor_len()
    }

    /// Stream offset that entry locations are relative to
    pub fn payload_base(&self) -> u64 {
        self.directory.payload_base
    }

    /// Entry names in directory order.
    pub fn list_names(&self) -> Vec<&str> {
        self.directory.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Find an entry by exact name.
    pub fn find(&self, name: &str) -> Option<&Entry> {
        self.directory.entries.iter().find(|e| e.name == name)
    }

    /// Extract every entry below `dest`, overwriting existing files.
    pub fn extract_all(&self, dest: impl AsRef<Path>) -> Result<ExtractionSummary> {
        self.extract_all_with_options(dest, &ExtractOptions::default(), &|_| {})
    }

    /// Extract entries below `dest` in a single forward pass.
    pub fn extract_all_with_options(
        &self,
        dest: impl AsRef<Path>,
        options: &ExtractOptions,
        progress: ProgressCallback,
    ) -> Result<ExtractionSummary> {
        self.extractor().extract_all(dest.as_ref(), options, progress)
    }

    /// Extract the named entries in a single forward pass.
    pub fn extract_files(&self, names: &[&str], dest: impl AsRef<Path>) -> Result<ExtractionSummary> {
        self.extractor().extract_named(names, dest.as_ref(), &|_| {})
    }

    /// Extract one entry by exact name.
    ///
    /// A fresh stream is opened and read from the start of the payload, so
    /// for compressed archives everything before the entry is inflated and
    /// discarded. An unknown name is not an error: nothing is written and
    /// `Ok(None)` is returned.
    pub fn extract(&self, name: &str, dest: impl AsRef<Path>) -> Result<Option<PathBuf>> {
        let Some(entry) = self.find(name) else {
            tracing::debug!("No entry named {name} in {}", self.path.display());
            return Ok(None);
        };

        let mut reader = EntryReader::new(self.extractor())?;
        reader.extract(entry, dest.as_ref()).map(Some)
    }

    /// Read one entry into memory. `Ok(None)` if there is no such entry.
    pub fn read_entry(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let Some(entry) = self.find(name) else {
            return Ok(None);
        };

        let mut reader = EntryReader::new(self.extractor())?;
        reader.read(entry).map(Some)
    }

    /// A reader for repeated single-entry reads over one stream.
    pub fn entry_reader(&self) -> Result<EntryReader<'_>> {
        EntryReader::new(self.extractor())
    }

    fn extractor(&self) -> Extractor<'_> {
        Extractor::new(
            &self.path,
            self.encoding,
            self.directory.payload_base,
            &self.directory.entries,
        )
    }
}

impl AssetArchive for DagorArchive {
    fn list_names(&self) -> Vec<&str> {
        DagorArchive::list_names(self)
    }

    fn extract_all(&self, dest: &Path) -> Result<ExtractionSummary> {
        DagorArchive::extract_all(self, dest)
    }

    fn extract(&self, name: &str, dest: &Path) -> Result<Option<PathBuf>> {
        DagorArchive::extract(self, name, dest)
    }
}
