use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use super::{DirectoryEntry, Snapshot};

/// The snapshot as it looks after the mutations committed so far in a run.
///
/// Resolvers decide against this view instead of the raw snapshot, so a later
/// decision sees earlier removals and renames without re-reading the disk.
#[derive(Debug)]
pub struct Namespace<'s> {
    snapshot: &'s Snapshot,
    removed: HashSet<PathBuf>,
    added: BTreeSet<PathBuf>,
}

impl<'s> Namespace<'s> {
    pub fn new(snapshot: &'s Snapshot) -> Self {
        Self {
            snapshot,
            removed: HashSet::new(),
            added: BTreeSet::new(),
        }
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.added.contains(path)
            || (self.snapshot.get(path).is_some() && !self.removed.contains(path))
    }

    /// Snapshot entries in `dir` that have been neither removed nor renamed away.
    pub fn live_siblings<'a>(
        &'a self,
        dir: &Path,
    ) -> impl Iterator<Item = &'s DirectoryEntry> + 'a {
        self.snapshot
            .siblings(dir)
            .filter(move |entry| !self.removed.contains(&entry.path))
    }

    /// Find a live name in `dir` equal to `name` ignoring case. An exact match wins
    /// over a case-folded one.
    pub fn find_ignore_case(&self, dir: &Path, name: &str) -> Option<PathBuf> {
        let folded = name.to_lowercase();
        let mut case_folded = None;

        let added = self.added.iter().filter(|path| path.parent() == Some(dir));
        for path in self.live_siblings(dir).map(|entry| &entry.path).chain(added) {
            let Some(candidate) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if candidate == name {
                return Some(path.clone());
            }
            if case_folded.is_none() && candidate.to_lowercase() == folded {
                case_folded = Some(path.clone());
            }
        }
        case_folded
    }

    pub fn commit_removal(&mut self, path: &Path) {
        self.added.remove(path);
        self.removed.insert(path.to_path_buf());
    }

    pub fn commit_rename(&mut self, from: &Path, to: &Path) {
        self.commit_removal(from);
        self.removed.remove(to);
        self.added.insert(to.to_path_buf());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(names: &[&str]) -> Snapshot {
        let entries = names
            .iter()
            .map(|name| DirectoryEntry::new(Path::new("/r").join(name), 1, false).unwrap())
            .collect();
        Snapshot::new("/r", entries)
    }

    #[test]
    fn test_removal_hides_entry() {
        let snap = snapshot(&["a.jpg", "b.jpg"]);
        let mut ns = Namespace::new(&snap);
        ns.commit_removal(Path::new("/r/a.jpg"));

        assert!(!ns.contains(Path::new("/r/a.jpg")));
        assert!(ns.contains(Path::new("/r/b.jpg")));
        let live: Vec<&str> = ns
            .live_siblings(Path::new("/r"))
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(live, vec!["b.jpg"]);
    }

    #[test]
    fn test_rename_moves_name() {
        let snap = snapshot(&["a (1).jpg.xmp"]);
        let mut ns = Namespace::new(&snap);
        ns.commit_rename(Path::new("/r/a (1).jpg.xmp"), Path::new("/r/a.jpg.xmp"));

        assert!(!ns.contains(Path::new("/r/a (1).jpg.xmp")));
        assert!(ns.contains(Path::new("/r/a.jpg.xmp")));
        assert_eq!(
            ns.find_ignore_case(Path::new("/r"), "A.JPG.xmp"),
            Some(PathBuf::from("/r/a.jpg.xmp"))
        );

        // Removing a renamed-in path drops it from the view again.
        ns.commit_removal(Path::new("/r/a.jpg.xmp"));
        assert!(!ns.contains(Path::new("/r/a.jpg.xmp")));
    }

    #[test]
    fn test_exact_match_preferred() {
        let snap = snapshot(&["A.jpg.xmp", "a.jpg.xmp"]);
        let ns = Namespace::new(&snap);
        assert_eq!(
            ns.find_ignore_case(Path::new("/r"), "a.jpg.xmp"),
            Some(PathBuf::from("/r/a.jpg.xmp"))
        );
        assert_eq!(ns.find_ignore_case(Path::new("/r"), "b.jpg.xmp"), None);
    }
}
