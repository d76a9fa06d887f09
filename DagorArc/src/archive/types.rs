//! Types for Dagor archive handling

use std::path::PathBuf;

/// How the post-header region of an archive is encoded.
///
/// Decided by [`probe`](super::probe) from the primary header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadEncoding {
    /// Directory and payload are stored as-is.
    Raw,
    /// Directory and payload form a single zlib stream starting at 0x10.
    Zlib,
}

impl PayloadEncoding {
    #[must_use]
    pub fn is_compressed(self) -> bool {
        matches!(self, PayloadEncoding::Zlib)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PayloadEncoding::Raw => "raw",
            PayloadEncoding::Zlib => "zlib",
        }
    }
}

/// Which stream offset entry locations are counted from.
///
/// The two readings cannot be told apart from the directory alone: a first
/// member stored at a leading gap looks like a stream-start offset. The
/// caller has to pick one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Addressing {
    /// Locations are offsets from the first byte after the directory.
    #[default]
    AfterDirectory,
    /// Locations are offsets from the start of the post-header stream (0x10).
    StreamStart,
}

impl Addressing {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Addressing::AfterDirectory => "directory",
            Addressing::StreamStart => "stream",
        }
    }
}

impl std::str::FromStr for Addressing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "directory" | "after-directory" => Ok(Addressing::AfterDirectory),
            "stream" | "stream-start" => Ok(Addressing::StreamStart),
            _ => Err(format!(
                "Invalid addressing '{s}'. Valid values: directory, stream"
            )),
        }
    }
}

/// One archived member as described by the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Position in directory order
    pub index: usize,
    /// Path of the member inside the archive
    pub name: String,
    /// Offset into the payload region. For entries after the first,
    /// 0 means "directly after the previous entry".
    pub location: u32,
    /// Size of the member in bytes
    pub length: u32,
}

impl Entry {
    /// Whether this entry continues directly after its predecessor.
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        self.index > 0 && self.location == 0
    }
}

/// Progress information during extraction
#[derive(Debug, Clone)]
pub struct ExtractProgress {
    /// Current operation phase
    pub phase: ExtractPhase,
    /// Current item number (1-indexed)
    pub current: usize,
    /// Total number of items
    pub total: usize,
    /// Current entry being processed (if applicable)
    pub current_file: Option<String>,
}

impl ExtractProgress {
    #[must_use]
    pub fn new(phase: ExtractPhase, current: usize, total: usize) -> Self {
        Self {
            phase,
            current,
            total,
            current_file: None,
        }
    }

    #[must_use]
    pub fn with_file(
        phase: ExtractPhase,
        current: usize,
        total: usize,
        file: impl Into<String>,
    ) -> Self {
        Self {
            phase,
            current,
            total,
            current_file: Some(file.into()),
        }
    }

    /// Get the progress percentage (0.0 - 1.0)
    #[must_use]
    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.current as f32 / self.total as f32
        }
    }
}

/// Phase of an extraction pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractPhase {
    /// Opening the payload stream and skipping to the first entry
    OpeningStream,
    /// Writing a member to disk
    WritingFiles,
    /// Skipping over a member that was not selected
    SkippingFiles,
    /// Operation complete
    Complete,
}

impl ExtractPhase {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpeningStream => "Opening stream",
            Self::WritingFiles => "Writing files",
            Self::SkippingFiles => "Skipping files",
            Self::Complete => "Complete",
        }
    }
}

/// Outcome of an extraction pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    /// Paths written, in extraction order
    pub written: Vec<PathBuf>,
    /// Total payload bytes written
    pub bytes_written: u64,
    /// Entries passed over (filtered out or kept because they already existed)
    pub skipped: usize,
    /// Requested names that are not in the archive
    pub missing: Vec<String>,
}

impl ExtractionSummary {
    #[must_use]
    pub fn files_written(&self) -> usize {
        self.written.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contiguous_only_after_first() {
        let first = Entry { index: 0, name: "a".into(), location: 0, length: 1 };
        let second = Entry { index: 1, name: "b".into(), location: 0, length: 1 };
        let third = Entry { index: 2, name: "c".into(), location: 40, length: 1 };
        assert!(!first.is_contiguous());
        assert!(second.is_contiguous());
        assert!(!third.is_contiguous());
    }

    #[test]
    fn test_addressing_from_str() {
        assert_eq!("Directory".parse::<Addressing>().unwrap(), Addressing::AfterDirectory);
        assert_eq!("stream".parse::<Addressing>().unwrap(), Addressing::StreamStart);
        assert_eq!("after-directory".parse::<Addressing>().unwrap(), Addressing::AfterDirectory);
        assert_eq!(Addressing::default(), Addressing::AfterDirectory);
        assert!("auto".parse::<Addressing>().is_err());
    }

    #[test]
    fn test_progress_percentage() {
        assert!((ExtractProgress::new(ExtractPhase::Complete, 0, 0).percentage() - 1.0).abs() < f32::EPSILON);
        let p = ExtractProgress::with_file(ExtractPhase::WritingFiles, 1, 4, "a.txt");
        assert!((p.percentage() - 0.25).abs() < f32::EPSILON);
        assert_eq!(p.current_file.as_deref(), Some("a.txt"));
    }
}
