use std::path::PathBuf;
use tracing::{debug, trace};

use super::is_sidecar;
use crate::normalize::normalize;
use crate::scanner::Snapshot;

/// A marked file and its canonical sibling with the same size.
///
/// Sizes are the only comparison; content is never read. Two distinct files of
/// identical size that differ only by a marker are treated as duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicatePair {
    pub original: PathBuf,
    pub duplicate: PathBuf,
    pub size: u64,
}

/// Pair every marked regular file with a same-size, same-directory sibling
/// whose name is the marked name with all markers stripped.
///
/// Sidecar files take no part on either side. Marked files without such a
/// sibling (absent, a directory, or a different size) produce nothing.
/// Pairs come out in lexical path order of the duplicate.
pub fn resolve_duplicates(snapshot: &Snapshot, sidecar_suffix: &str) -> Vec<DuplicatePair> {
    let mut pairs = Vec::new();

    for entry in snapshot.entries() {
        if entry.is_dir || is_sidecar(&entry.name, sidecar_suffix) {
            continue;
        }

        let canonical = normalize(&entry.name);
        if canonical == entry.name || canonical.is_empty() {
            continue;
        }

        let original_path = entry.parent().join(&canonical);
        let original = match snapshot.get(&original_path) {
            Some(original) => original,
            None => {
                trace!("No canonical sibling for {}", entry.path.display());
                continue;
            }
        };

        if original.is_dir || is_sidecar(&original.name, sidecar_suffix) {
            continue;
        }
        if original.size != entry.size {
            debug!(
                "Size mismatch, not a duplicate: {} ({} bytes) vs {} ({} bytes)",
                entry.path.display(),
                entry.size,
                original.path.display(),
                original.size
            );
            continue;
        }

        pairs.push(DuplicatePair {
            original: original.path.clone(),
            duplicate: entry.path.clone(),
            size: entry.size,
        });
    }

    pairs
}
