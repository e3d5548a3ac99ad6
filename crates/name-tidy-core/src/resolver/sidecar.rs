use std::path::PathBuf;
use tracing::debug;

use super::is_sidecar;
use crate::filesystem::FileSystem;
use crate::normalize::{is_marked, normalize};
use crate::scanner::{split_extension, DirectoryEntry, Namespace};

/// Where a sidecar stands relative to the base files around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingDecision {
    /// A sibling carries exactly the sidecar's name minus its suffix.
    AlreadyCorrect,
    /// Both a bare and a numbered variant of the base file exist.
    Ambiguous,
    /// No base file of the right extension and stem exists; remove the sidecar.
    Orphaned,
    /// Rename the sidecar to follow its base file.
    NeedsRename { target: PathBuf },
    /// The rename target is taken by a sidecar whose base file is gone; remove that one.
    Conflict { existing: PathBuf },
    /// The rename target already exists and its base file is present.
    DestinationBound { existing: PathBuf },
    /// The rename target exists under a different letter case. Left alone.
    CaseConflict { existing: PathBuf },
}

enum State<'s> {
    Start,
    Searching,
    CandidateFound(&'s DirectoryEntry),
    Decided(BindingDecision),
}

/// Binds a single sidecar to its base file. One `bind` call walks
/// `Start -> Searching -> CandidateFound` until a decision is reached.
pub struct SidecarBinder<'a, 's> {
    namespace: &'a Namespace<'s>,
    fs: &'a dyn FileSystem,
    sidecar_suffix: &'a str,
}

impl<'a, 's> SidecarBinder<'a, 's> {
    pub fn new(
        namespace: &'a Namespace<'s>,
        fs: &'a dyn FileSystem,
        sidecar_suffix: &'a str,
    ) -> Self {
        Self {
            namespace,
            fs,
            sidecar_suffix,
        }
    }

    pub fn bind(&self, sidecar: &DirectoryEntry) -> BindingDecision {
        let literal = self.literal_base_name(sidecar);
        let mut state = State::Start;

        loop {
            state = match state {
                State::Start => self.start(sidecar, literal),
                State::Searching => self.search(sidecar, literal),
                State::CandidateFound(candidate) => self.candidate_found(sidecar, candidate),
                State::Decided(decision) => {
                    debug!("{}: {:?}", sidecar.path.display(), decision);
                    return decision;
                }
            };
        }
    }

    /// Sidecar name with its suffix removed; keeps any marker and the base extension.
    fn literal_base_name<'e>(&self, sidecar: &'e DirectoryEntry) -> &'e str {
        sidecar
            .name
            .strip_suffix(self.sidecar_suffix)
            .unwrap_or(&sidecar.name)
    }

    fn start(&self, sidecar: &DirectoryEntry, literal: &str) -> State<'s> {
        if self.namespace.contains(&sidecar.parent().join(literal)) {
            State::Decided(BindingDecision::AlreadyCorrect)
        } else {
            State::Searching
        }
    }

    fn search(&self, sidecar: &DirectoryEntry, literal: &str) -> State<'s> {
        let base_extension = split_extension(literal).1.to_lowercase();
        let normalized_literal = normalize(literal);
        let wanted_stem = split_extension(&normalized_literal).0.to_lowercase();

        let (marked, bare): (Vec<&'s DirectoryEntry>, Vec<&'s DirectoryEntry>) = self
            .namespace
            .live_siblings(sidecar.parent())
            .filter(|entry| !entry.is_dir && !is_sidecar(&entry.name, self.sidecar_suffix))
            .filter(|entry| entry.extension.to_lowercase() == base_extension)
            .filter(|entry| normalize(entry.stem()).to_lowercase() == wanted_stem)
            .partition(|entry| is_marked(&entry.name));

        if !marked.is_empty() && !bare.is_empty() {
            return State::Decided(BindingDecision::Ambiguous);
        }

        match marked.first().or_else(|| bare.first()) {
            Some(&candidate) => State::CandidateFound(candidate),
            None => State::Decided(BindingDecision::Orphaned),
        }
    }

    fn candidate_found(&self, sidecar: &DirectoryEntry, candidate: &DirectoryEntry) -> State<'s> {
        let target_name = format!("{}{}", candidate.name, self.sidecar_suffix);
        if target_name == sidecar.name {
            return State::Decided(BindingDecision::AlreadyCorrect);
        }

        let dir = sidecar.parent();
        let decision = match self.namespace.find_ignore_case(dir, &target_name) {
            Some(existing)
                if existing.file_name().and_then(|n| n.to_str()) == Some(target_name.as_str()) =>
            {
                if self.fs.exists(&candidate.path) {
                    BindingDecision::DestinationBound { existing }
                } else {
                    BindingDecision::Conflict { existing }
                }
            }
            Some(existing) => BindingDecision::CaseConflict { existing },
            None => BindingDecision::NeedsRename {
                target: dir.join(target_name),
            },
        };
        State::Decided(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::FileStat;
    use crate::scanner::Snapshot;
    use std::io;
    use std::path::Path;

    /// Reports every path as present except the listed ones. Never mutates.
    struct StubFs {
        missing: Vec<PathBuf>,
    }

    impl FileSystem for StubFs {
        fn exists(&self, path: &Path) -> bool {
            !self.missing.iter().any(|m| m == path)
        }
        fn stat(&self, _path: &Path) -> io::Result<FileStat> {
            Err(io::Error::new(io::ErrorKind::Unsupported, "stub"))
        }
        fn remove(&self, _path: &Path) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Unsupported, "stub"))
        }
        fn rename(&self, _from: &Path, _to: &Path) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Unsupported, "stub"))
        }
    }

    fn present() -> StubFs {
        StubFs { missing: vec![] }
    }

    fn snapshot(names: &[&str]) -> Snapshot {
        let entries = names
            .iter()
            .map(|name| DirectoryEntry::new(Path::new("/r").join(name), 1, false).unwrap())
            .collect();
        Snapshot::new("/r", entries)
    }

    fn bind_with(snap: &Snapshot, fs: &StubFs, sidecar: &str) -> BindingDecision {
        let namespace = Namespace::new(snap);
        let entry = snap.get(&Path::new("/r").join(sidecar)).unwrap();
        SidecarBinder::new(&namespace, fs, ".xmp").bind(entry)
    }

    fn bind(names: &[&str], sidecar: &str) -> BindingDecision {
        bind_with(&snapshot(names), &present(), sidecar)
    }

    #[test]
    fn test_literal_match_is_already_correct() {
        assert_eq!(
            bind(&["a (2).mp4", "a (2).mp4.xmp", "a.mp4"], "a (2).mp4.xmp"),
            BindingDecision::AlreadyCorrect
        );
    }

    #[test]
    fn test_bare_and_marked_is_ambiguous() {
        assert_eq!(
            bind(&["a.mp4", "a (1).mp4", "a (3).mp4.xmp"], "a (3).mp4.xmp"),
            BindingDecision::Ambiguous
        );
    }

    #[test]
    fn test_no_base_is_orphaned() {
        assert_eq!(
            bind(&["b.jpg", "b.png.xmp"], "b.png.xmp"),
            BindingDecision::Orphaned
        );
        assert_eq!(bind(&["orphan.xmp"], "orphan.xmp"), BindingDecision::Orphaned);
    }

    #[test]
    fn test_directory_is_never_a_candidate() {
        let snap = Snapshot::new(
            "/r",
            vec![
                DirectoryEntry::new(PathBuf::from("/r/c (1).png"), 0, true).unwrap(),
                DirectoryEntry::new(PathBuf::from("/r/c.png.xmp"), 1, false).unwrap(),
            ],
        );
        assert_eq!(
            bind_with(&snap, &present(), "c.png.xmp"),
            BindingDecision::Orphaned
        );
    }

    #[test]
    fn test_marked_candidate_is_preferred() {
        assert_eq!(
            bind(&["a (2).jpg", "a (1).jpg", "a.jpg.xmp"], "a.jpg.xmp"),
            BindingDecision::NeedsRename {
                target: PathBuf::from("/r/a (1).jpg.xmp")
            }
        );
    }

    #[test]
    fn test_bare_candidate_when_no_marked_variant() {
        assert_eq!(
            bind(&["IMG.jpg", "IMG (1).jpg.xmp"], "IMG (1).jpg.xmp"),
            BindingDecision::NeedsRename {
                target: PathBuf::from("/r/IMG.jpg.xmp")
            }
        );
    }

    #[test]
    fn test_extension_and_stem_match_ignore_case() {
        assert_eq!(
            bind(&["Clip.MP4", "clip (1).mp4.xmp"], "clip (1).mp4.xmp"),
            BindingDecision::NeedsRename {
                target: PathBuf::from("/r/Clip.MP4.xmp")
            }
        );
    }

    #[test]
    fn test_existing_target_with_live_base_is_skipped() {
        assert_eq!(
            bind(&["a (1).jpg", "a (1).jpg.xmp", "a.jpg.xmp"], "a.jpg.xmp"),
            BindingDecision::DestinationBound {
                existing: PathBuf::from("/r/a (1).jpg.xmp")
            }
        );
    }

    #[test]
    fn test_existing_target_with_vanished_base_is_conflict() {
        let snap = snapshot(&["a (1).jpg", "a (1).jpg.xmp", "a.jpg.xmp"]);
        let fs = StubFs {
            missing: vec![PathBuf::from("/r/a (1).jpg")],
        };
        assert_eq!(
            bind_with(&snap, &fs, "a.jpg.xmp"),
            BindingDecision::Conflict {
                existing: PathBuf::from("/r/a (1).jpg.xmp")
            }
        );
    }

    #[test]
    fn test_case_folded_target_is_left_alone() {
        assert_eq!(
            bind(&["a (1).jpg", "A (1).JPG.xmp", "a.jpg.xmp"], "a.jpg.xmp"),
            BindingDecision::CaseConflict {
                existing: PathBuf::from("/r/A (1).JPG.xmp")
            }
        );
    }

    #[test]
    fn test_removed_entry_is_not_a_candidate() {
        let snap = snapshot(&["img.jpg", "img (1).jpg", "img (1).jpg.xmp"]);
        let mut namespace = Namespace::new(&snap);
        namespace.commit_removal(Path::new("/r/img (1).jpg"));

        let fs = present();
        let entry = snap.get(Path::new("/r/img (1).jpg.xmp")).unwrap();
        assert_eq!(
            SidecarBinder::new(&namespace, &fs, ".xmp").bind(entry),
            BindingDecision::NeedsRename {
                target: PathBuf::from("/r/img.jpg.xmp")
            }
        );
    }

    #[test]
    fn test_committed_rename_blocks_second_rename() {
        let snap = snapshot(&["a (1).jpg", "a.jpg.xmp", "a (2).jpg.xmp"]);
        let mut namespace = Namespace::new(&snap);
        namespace.commit_rename(Path::new("/r/a (2).jpg.xmp"), Path::new("/r/a (1).jpg.xmp"));

        let fs = present();
        let entry = snap.get(Path::new("/r/a.jpg.xmp")).unwrap();
        assert_eq!(
            SidecarBinder::new(&namespace, &fs, ".xmp").bind(entry),
            BindingDecision::DestinationBound {
                existing: PathBuf::from("/r/a (1).jpg.xmp")
            }
        );
    }
}
