mod namespace;
pub mod walk;

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

pub use namespace::Namespace;
pub use walk::scan;

/// Immutable snapshot of one directory entry, captured at scan time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub path: PathBuf,
    /// Full file name including any extension.
    pub name: String,
    /// Text after the last dot, without the dot. Empty when there is none.
    pub extension: String,
    pub size: u64,
    pub is_dir: bool,
}

impl DirectoryEntry {
    /// Build an entry from its path. Returns `None` when the file name is missing or not UTF-8.
    pub fn new(path: PathBuf, size: u64, is_dir: bool) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_string();
        let extension = if is_dir {
            String::new()
        } else {
            split_extension(&name).1.to_string()
        };
        Some(Self {
            path,
            name,
            extension,
            size,
            is_dir,
        })
    }

    /// Name without its extension.
    pub fn stem(&self) -> &str {
        if self.is_dir {
            &self.name
        } else {
            split_extension(&self.name).0
        }
    }

    pub fn parent(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// Split `name` at its last dot. A leading dot does not start an extension,
/// so `.hidden` has stem `.hidden` and no extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], &name[idx + 1..]),
        _ => (name, ""),
    }
}

/// A read-only listing of a directory tree, grouped by parent directory.
#[derive(Debug)]
pub struct Snapshot {
    root: PathBuf,
    entries: Vec<DirectoryEntry>,
    by_path: HashMap<PathBuf, usize>,
    by_parent: BTreeMap<PathBuf, Vec<usize>>,
}

impl Snapshot {
    pub fn new(root: impl Into<PathBuf>, mut entries: Vec<DirectoryEntry>) -> Self {
        entries.sort_by(|a, b| a.path.cmp(&b.path));

        let mut by_path = HashMap::with_capacity(entries.len());
        let mut by_parent: BTreeMap<PathBuf, Vec<usize>> = BTreeMap::new();
        for (idx, entry) in entries.iter().enumerate() {
            by_path.insert(entry.path.clone(), idx);
            by_parent
                .entry(entry.parent().to_path_buf())
                .or_default()
                .push(idx);
        }
        for siblings in by_parent.values_mut() {
            siblings.sort_by(|&a, &b| entries[a].name.cmp(&entries[b].name));
        }

        Self {
            root: root.into(),
            entries,
            by_path,
            by_parent,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All entries in lexical path order.
    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, path: &Path) -> Option<&DirectoryEntry> {
        self.by_path.get(path).map(|&idx| &self.entries[idx])
    }

    /// Entries directly inside `dir`, sorted by name.
    pub fn siblings<'a>(&'a self, dir: &Path) -> impl Iterator<Item = &'a DirectoryEntry> + 'a {
        self.by_parent
            .get(dir)
            .into_iter()
            .flatten()
            .map(move |&idx| &self.entries[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str, size: u64) -> DirectoryEntry {
        DirectoryEntry::new(PathBuf::from(path), size, false).unwrap()
    }

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("a (1).jpg"), ("a (1)", "jpg"));
        assert_eq!(split_extension("clip.mp4.xmp"), ("clip.mp4", "xmp"));
        assert_eq!(split_extension("orphan"), ("orphan", ""));
        assert_eq!(split_extension(".hidden"), (".hidden", ""));
        assert_eq!(split_extension("trailing."), ("trailing", ""));
    }

    #[test]
    fn test_entry_fields() {
        let entry = file("/r/sub/IMG_01 (2).ARW", 9);
        assert_eq!(entry.name, "IMG_01 (2).ARW");
        assert_eq!(entry.extension, "ARW");
        assert_eq!(entry.stem(), "IMG_01 (2)");
        assert_eq!(entry.parent(), Path::new("/r/sub"));

        let dir = DirectoryEntry::new(PathBuf::from("/r/album.2020"), 0, true).unwrap();
        assert_eq!(dir.extension, "");
        assert_eq!(dir.stem(), "album.2020");
    }

    #[test]
    fn test_siblings_sorted_by_name() {
        let snapshot = Snapshot::new(
            "/r",
            vec![
                file("/r/b.jpg", 1),
                file("/r/sub/c.jpg", 1),
                file("/r/a.jpg", 1),
            ],
        );
        let names: Vec<&str> = snapshot
            .siblings(Path::new("/r"))
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.jpg"]);
        assert_eq!(snapshot.siblings(Path::new("/missing")).count(), 0);
        assert_eq!(snapshot.entries()[0].name, "a.jpg");
    }
}
