//! Sequential extraction of entries from a payload stream

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::stream::PayloadStream;
use super::{Entry, ExtractOptions, ExtractPhase, ExtractProgress, ExtractionSummary, PayloadEncoding};
use crate::error::{Error, Result};
use crate::utils::entry_relative_path;

/// Progress callback type
pub type ProgressCallback<'a> = &'a dyn Fn(&ExtractProgress);

/// Where an entry's bytes start, and how far the stream must move to get there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Payload offset of the first byte of the entry
    pub offset: u64,
    /// Bytes between the end of the previous entry and this one
    pub gap: u64,
}

/// Tracks the end of the previous entry while walking the directory in order.
#[derive(Debug, Default)]
pub struct OffsetChain {
    end_of_last: u64,
}

impl OffsetChain {
    /// Place the next entry. Entries must be fed in directory order.
    pub fn place(&mut self, entry: &Entry, archive: &Path) -> Result<Placement> {
        let placement = if entry.is_contiguous() {
            Placement {
                offset: self.end_of_last,
                gap: 0,
            }
        } else {
            let offset = u64::from(entry.location);
            let gap = offset.checked_sub(self.end_of_last).ok_or_else(|| {
                Error::malformed(
                    archive,
                    format!(
                        "entry #{} '{}' at {} starts before the end of the previous entry ({})",
                        entry.index, entry.name, offset, self.end_of_last
                    ),
                )
            })?;
            Placement { offset, gap }
        };

        self.end_of_last = placement.offset + u64::from(entry.length);
        Ok(placement)
    }

    /// End of the most recently placed entry.
    pub fn end_of_last(&self) -> u64 {
        self.end_of_last
    }
}

/// Payload offset of `entries[target]`, resolving sentinels through the chain.
pub fn effective_offset(entries: &[Entry], target: usize, archive: &Path) -> Result<u64> {
    let preceding = entries.get(..=target).ok_or_else(|| {
        Error::malformed(
            archive,
            format!("entry index {target} outside directory of {} entries", entries.len()),
        )
    })?;

    let mut chain = OffsetChain::default();
    let mut offset = 0;
    for entry in preceding {
        offset = chain.place(entry, archive)?.offset;
    }
    Ok(offset)
}

/// Walks an archive's entries over a forward-only payload stream.
pub struct Extractor<'a> {
    archive: &'a Path,
    encoding: PayloadEncoding,
    payload_base: u64,
    entries: &'a [Entry],
}

impl<'a> Extractor<'a> {
    pub fn new(
        archive: &'a Path,
        encoding: PayloadEncoding,
        payload_base: u64,
        entries: &'a [Entry],
    ) -> Self {
        Self {
            archive,
            encoding,
            payload_base,
            entries,
        }
    }

    /// Extract every selected entry in one forward pass.
    pub fn extract_all(
        &self,
        dest: &Path,
        options: &ExtractOptions,
        progress: ProgressCallback,
    ) -> Result<ExtractionSummary> {
        self.run(dest, progress, |entry| {
            if !options.selects(&entry.name) {
                return Ok(Selection::Skip);
            }
            if options.keep_existing && dest.join(entry_relative_path(&entry.name)?).exists() {
                tracing::warn!("Keeping existing file for {}", entry.name);
                return Ok(Selection::Skip);
            }
            Ok(Selection::Write)
        })
    }

    /// Extract the named entries in one forward pass. Names that are not in
    /// the archive are listed in [`ExtractionSummary::missing`].
    pub fn extract_named(&self, names: &[&str], dest: &Path, progress: ProgressCallback) -> Result<ExtractionSummary> {
        let missing: Vec<String> = names
            .iter()
            .filter(|name| !self.entries.iter().any(|e| e.name == **name))
            .map(|name| (*name).to_string())
            .collect();

        let mut summary = self.run(dest, progress, |entry| {
            Ok(if names.contains(&entry.name.as_str()) {
                Selection::Write
            } else {
                Selection::Skip
            })
        })?;
        summary.missing = missing;
        Ok(summary)
    }

    fn run<F>(&self, dest: &Path, progress: ProgressCallback, mut select: F) -> Result<ExtractionSummary>
    where
        F: FnMut(&Entry) -> Result<Selection>,
    {
        let total = self.entries.len();
        progress(&ExtractProgress::new(ExtractPhase::OpeningStream, 0, total));

        let mut stream = PayloadStream::open(self.archive, self.encoding)?;
        stream.skip(self.payload_base)?;

        let mut chain = OffsetChain::default();
        let mut summary = ExtractionSummary::default();

        for (i, entry) in self.entries.iter().enumerate() {
            let placement = chain.place(entry, self.archive)?;
            let selection = select(entry).map_err(|e| self.entry_error(entry, e))?;

            let outcome = match selection {
                Selection::Write => {
                    progress(&ExtractProgress::with_file(
                        ExtractPhase::WritingFiles,
                        i + 1,
                        total,
                        &entry.name,
                    ));
                    stream
                        .skip(placement.gap)
                        .and_then(|()| stream.read_exactly(u64::from(entry.length)))
                        .and_then(|data| write_member(dest, &entry.name, &data))
                        .map(Some)
                }
                Selection::Skip => {
                    progress(&ExtractProgress::with_file(
                        ExtractPhase::SkippingFiles,
                        i + 1,
                        total,
                        &entry.name,
                    ));
                    stream
                        .skip(placement.gap + u64::from(entry.length))
                        .map(|()| None)
                }
            };

            match outcome.map_err(|e| self.entry_error(entry, e))? {
                Some(path) => {
                    tracing::debug!(
                        "Extracted {} ({} bytes at payload offset {}) to {}",
                        entry.name,
                        entry.length,
                        placement.offset,
                        path.display()
                    );
                    summary.bytes_written += u64::from(entry.length);
                    summary.written.push(path);
                }
                None => summary.skipped += 1,
            }
        }

        progress(&ExtractProgress::new(ExtractPhase::Complete, total, total));
        tracing::info!(
            "Extracted {} of {} entries ({} bytes) from {}",
            summary.files_written(),
            total,
            summary.bytes_written,
            self.archive.display()
        );

        Ok(summary)
    }

    fn entry_error(&self, entry: &Entry, source: Error) -> Error {
        Error::Entry {
            path: self.archive.to_path_buf(),
            index: entry.index,
            name: entry.name.clone(),
            source: Box::new(source),
        }
    }
}

enum Selection {
    Write,
    Skip,
}

/// Reads single entries on demand, reusing one stream while requests move
/// forward and reopening it when a request lies behind the cursor.
pub struct EntryReader<'a> {
    extractor: Extractor<'a>,
    stream: PayloadStream,
}

impl<'a> EntryReader<'a> {
    /// Open a fresh stream for `extractor`'s archive.
    pub fn new(extractor: Extractor<'a>) -> Result<Self> {
        let stream = PayloadStream::open(extractor.archive, extractor.encoding)?;
        Ok(Self { extractor, stream })
    }

    /// Read the bytes of `entry`.
    pub fn read(&mut self, entry: &Entry) -> Result<Vec<u8>> {
        self.read_inner(entry)
            .map_err(|e| self.extractor.entry_error(entry, e))
    }

    /// Read `entry` and write it below `dest`.
    pub fn extract(&mut self, entry: &Entry, dest: &Path) -> Result<PathBuf> {
        let data = self.read(entry)?;
        let path = write_member(dest, &entry.name, &data)
            .map_err(|e| self.extractor.entry_error(entry, e))?;
        tracing::debug!("Extracted {} to {}", entry.name, path.display());
        Ok(path)
    }

    fn read_inner(&mut self, entry: &Entry) -> Result<Vec<u8>> {
        let archive = self.extractor.archive;
        let known = self.extractor.entries.get(entry.index);
        if known.is_none_or(|e| e.name != entry.name) {
            return Err(Error::EntryNotFound(entry.name.clone()));
        }

        let offset = effective_offset(self.extractor.entries, entry.index, archive)?;
        let target = self.extractor.payload_base + offset;

        if target < self.stream.position() {
            self.stream.refresh()?;
        }
        self.stream.skip(target - self.stream.position())?;
        self.stream.read_exactly(u64::from(entry.length))
    }
}

/// Write `data` to `dest/name`, creating parent directories.
///
/// The bytes go to a temporary file next to the target that replaces it only
/// once fully written.
pub fn write_member(dest: &Path, name: &str, data: &[u8]) -> Result<PathBuf> {
    let target = dest.join(entry_relative_path(name)?);
    let parent = target.parent().unwrap_or(dest);

    std::fs::create_dir_all(parent).map_err(|source| Error::FileSystemFailure {
        path: parent.to_path_buf(),
        source,
    })?;

    let fs_error = |source| Error::FileSystemFailure {
        path: target.clone(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(parent).map_err(fs_error)?;
    tmp.write_all(data).map_err(fs_error)?;
    tmp.persist(&target).map_err(|e| fs_error(e.error))?;

    Ok(target)
}
