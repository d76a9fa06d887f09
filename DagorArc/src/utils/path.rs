//! Path utilities

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Normalize path separators to forward slashes (archive names use `/`)
pub fn normalize_path<P: AsRef<Path>>(path: P) -> String {
    path.as_ref().to_string_lossy().replace('\\', "/")
}

/// Turn an archive entry name into a path relative to the destination.
///
/// Both separators are accepted. Empty and `.` segments are dropped; absolute
/// names, drive prefixes and `..` segments are rejected so that a member can
/// never be written outside the destination directory.
pub fn entry_relative_path(name: &str) -> Result<PathBuf> {
    let normalized = name.replace('\\', "/");
    if normalized.starts_with('/') {
        return Err(Error::InvalidEntryPath(name.to_string()));
    }

    let mut relative = PathBuf::new();
    for segment in normalized.split('/') {
        match Path::new(segment).components().next() {
            None | Some(Component::CurDir) => {}
            Some(Component::Normal(part)) if Path::new(segment).components().count() == 1 => {
                relative.push(part);
            }
            _ => return Err(Error::InvalidEntryPath(name.to_string())),
        }
    }

    if relative.as_os_str().is_empty() {
        return Err(Error::InvalidEntryPath(name.to_string()));
    }
    Ok(relative)
}
