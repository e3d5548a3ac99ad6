use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub size: u64,
    pub is_dir: bool,
}

/// The mutating filesystem operations the engine relies on.
///
/// Every call is a single metadata operation; nothing here writes file content.
pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;
    fn stat(&self, path: &Path) -> io::Result<FileStat>;
    fn remove(&self, path: &Path) -> io::Result<()>;
    /// Rename `from` to `to`. Fails with `AlreadyExists` instead of replacing `to`.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// `std::fs` backed implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }

    fn stat(&self, path: &Path) -> io::Result<FileStat> {
        let metadata = fs::metadata(path)?;
        Ok(FileStat {
            size: metadata.len(),
            is_dir: metadata.is_dir(),
        })
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        if self.exists(to) {
            return Err(io::Error::new(
                ErrorKind::AlreadyExists,
                format!("destination {} already exists", to.display()),
            ));
        }
        fs::rename(from, to)
    }
}
