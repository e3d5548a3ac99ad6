use glob::Pattern;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::{DirectoryEntry, Snapshot};
use crate::error::{Error, Result};

/// Check that `root` is a readable directory before anything is scanned.
pub fn validate_root(root: &Path) -> Result<()> {
    let invalid = |source: io::Error| Error::InvalidRoot {
        path: root.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(root).map_err(invalid)?;
    if !metadata.is_dir() {
        return Err(invalid(io::Error::new(
            ErrorKind::Other,
            "not a directory",
        )));
    }
    fs::read_dir(root).map_err(invalid)?;
    Ok(())
}

/// Sequential, name-sorted walk of `root`. Builds a snapshot of every directory
/// and regular file below it, pruning paths that match an ignore glob.
/// Symlinks are not followed and not listed.
///
/// Any unreadable subtree aborts the walk with `Error::Traversal`.
pub fn scan(root: &Path, ignore_patterns: &[Pattern]) -> Result<Snapshot> {
    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_ignored(root, entry.path(), ignore_patterns));

    let mut entries = Vec::new();
    for entry_result in walker {
        let entry = entry_result.map_err(|source| {
            let path = source
                .path()
                .map_or_else(|| root.to_path_buf(), Path::to_path_buf);
            Error::Traversal { path, source }
        })?;

        let file_type = entry.file_type();
        if file_type.is_symlink() {
            debug!("Skipping symlink {}", entry.path().display());
            continue;
        }

        let size = if file_type.is_dir() {
            0
        } else {
            let path = entry.path().to_path_buf();
            entry
                .metadata()
                .map_err(|source| Error::Traversal { path, source })?
                .len()
        };

        match DirectoryEntry::new(entry.path().to_path_buf(), size, file_type.is_dir()) {
            Some(dir_entry) => entries.push(dir_entry),
            None => warn!(
                "Skipping entry with a non UTF-8 name: {}",
                entry.path().display()
            ),
        }
    }

    Ok(Snapshot::new(root, entries))
}

fn is_ignored(root: &Path, path: &Path, ignore_patterns: &[Pattern]) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    ignore_patterns
        .iter()
        .any(|pattern| pattern.matches_path(path) || pattern.matches_path(relative))
}
