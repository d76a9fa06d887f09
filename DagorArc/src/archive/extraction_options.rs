//! Options for bulk extraction

use crate::utils::matches_glob;

/// Options controlling which entries a bulk extraction writes and how.
///
/// # Example
///
/// ```no_run
/// use dagorarc::archive::{DagorArchive, ExtractOptions};
///
/// let archive = DagorArchive::open("grp_hdr.vromfs.bin")?;
/// let options = ExtractOptions::new()
///     .with_filter(Some("*.blk".to_string()))
///     .with_keep_existing(true);
/// archive.extract_all_with_options("out/", &options, &|_| {})?;
/// # Ok::<(), dagorarc::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Only write entries whose name (or file name) matches this glob.
    /// Supports `*` and `?`, case-insensitive.
    pub filter: Option<String>,

    /// Leave files that already exist at the destination untouched
    /// (default: overwrite)
    pub keep_existing: bool,
}

impl ExtractOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub fn with_keep_existing(mut self, keep: bool) -> Self {
        self.keep_existing = keep;
        self
    }

    /// Whether an entry name passes the filter.
    #[must_use]
    pub fn selects(&self, name: &str) -> bool {
        let Some(pattern) = &self.filter else {
            return true;
        };
        let file_name = name.rsplit(['/', '\\']).next().unwrap_or(name);
        matches_glob(pattern, name) || matches_glob(pattern, file_name)
    }
}
