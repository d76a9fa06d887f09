//! Error types for `DagorArc`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `DagorArc` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Archive Layout Errors ====================
    /// The file is shorter than a fixed-size header requires.
    #[error("truncated header in {}: expected {expected} bytes, found {found}", path.display())]
    TruncatedHeader {
        /// The archive path.
        path: PathBuf,
        /// Number of bytes the header requires.
        expected: u64,
        /// Number of bytes actually available.
        found: u64,
    },

    /// The file is shorter than the directory it declares.
    #[error("truncated archive {}: directory needs {expected} bytes, found {found}", path.display())]
    TruncatedArchive {
        /// The archive path.
        path: PathBuf,
        /// Descriptor length computed from the secondary header.
        expected: u64,
        /// Number of bytes actually available.
        found: u64,
    },

    /// A directory offset or length points outside the directory buffer,
    /// or entries are ordered so that extraction would have to move backwards.
    #[error("malformed directory in {}: {reason}", path.display())]
    MalformedDirectory {
        /// The archive path.
        path: PathBuf,
        /// What was out of bounds.
        reason: String,
    },

    // ==================== Stream Errors ====================
    /// The zlib payload stream is corrupt.
    #[error("decompression failed in {} at payload offset {offset}: {message}", path.display())]
    DecompressionFailure {
        /// The archive path.
        path: PathBuf,
        /// Stream position when the failure occurred.
        offset: u64,
        /// The error message from the inflater.
        message: String,
    },

    /// The payload stream ended before the requested bytes were consumed.
    #[error("unexpected end of payload in {} at offset {offset}: wanted {requested} bytes, got {available}", path.display())]
    UnexpectedEof {
        /// The archive path.
        path: PathBuf,
        /// Stream position where the read or skip started.
        offset: u64,
        /// Number of bytes requested.
        requested: u64,
        /// Number of bytes that were available.
        available: u64,
    },

    // ==================== File System Errors ====================
    /// A destination directory or file could not be created or written.
    #[error("failed to write {}: {source}", path.display())]
    FileSystemFailure {
        /// The destination path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// An entry name would resolve outside the destination directory.
    #[error("entry name escapes the destination directory: {0}")]
    InvalidEntryPath(String),

    // ==================== Entry Errors ====================
    /// A failure while processing a specific entry.
    #[error("entry #{index} '{name}' in {}: {source}", path.display())]
    Entry {
        /// The archive path.
        path: PathBuf,
        /// Index of the entry in directory order.
        index: usize,
        /// Name of the entry.
        name: String,
        /// The underlying failure.
        #[source]
        source: Box<Error>,
    },

    /// The requested entry was not found in the archive.
    #[error("entry not found in archive: {0}")]
    EntryNotFound(String),
}

impl Error {
    /// Innermost error, looking through [`Error::Entry`] wrappers.
    #[must_use]
    pub fn root(&self) -> &Error {
        match self {
            Error::Entry { source, .. } => source.root(),
            other => other,
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::MalformedDirectory {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// A specialized Result type for `DagorArc` operations.
pub type Result<T> = std::result::Result<T, Error>;
