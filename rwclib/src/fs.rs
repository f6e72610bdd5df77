//! Filesystem capability consumed by the scanner.
//!
//! The scanner only needs to `stat` and `open` paths. [`OsFs`] does this
//! against the real filesystem; [`MemFs`] keeps everything in memory.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Owner-read permission bit.
pub const OWNER_READ: u32 = 0o400;

/// What the scanner needs to know about a path before opening it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub is_dir: bool,
    /// Unix permission bits (`0o777` mask)
    pub mode: u32,
}

impl FileStat {
    pub fn is_readable(&self) -> bool {
        self.mode & OWNER_READ != 0
    }
}

/// Read-only view of a filesystem.
pub trait FileSystem: Send + Sync {
    fn stat(&self, path: &Path) -> io::Result<FileStat>;

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + Send>>;
}

/// The host filesystem.
///
/// Relative paths resolve against `root` when one is set, otherwise against
/// the process working directory.
#[derive(Debug, Clone, Default)]
pub struct OsFs {
    root: Option<PathBuf>,
}

impl OsFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) => root.join(path),
            None => path.to_path_buf(),
        }
    }
}

impl FileSystem for OsFs {
    fn stat(&self, path: &Path) -> io::Result<FileStat> {
        let meta = std::fs::metadata(self.resolve(path))?;
        Ok(FileStat {
            is_dir: meta.is_dir(),
            mode: permission_bits(&meta),
        })
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(File::open(self.resolve(path))?))
    }
}

#[cfg(unix)]
fn permission_bits(meta: &std::fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o777
}

#[cfg(not(unix))]
fn permission_bits(meta: &std::fs::Metadata) -> u32 {
    if meta.permissions().readonly() {
        0o444
    } else {
        0o644
    }
}

#[derive(Debug, Clone)]
enum MemEntry {
    File { data: Arc<[u8]>, mode: u32 },
    Dir,
}

/// In-memory filesystem.
///
/// Paths are normalized (`./a/../b.txt` is `b.txt`) before lookup.
///
/// ```rust
/// use rwclib::{FileSystem, MemFs};
/// use std::path::Path;
///
/// let fs = MemFs::new()
///     .file("notes.txt", "hello\n")
///     .file_with_mode("secret.txt", "shh", 0o000)
///     .dir("docs");
///
/// assert!(fs.stat(Path::new("docs")).unwrap().is_dir);
/// assert!(!fs.stat(Path::new("secret.txt")).unwrap().is_readable());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemFs {
    entries: HashMap<PathBuf, MemEntry>,
}

impl MemFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a readable file (`0o644`).
    pub fn file(self, path: impl AsRef<Path>, data: impl AsRef<[u8]>) -> Self {
        self.file_with_mode(path, data, 0o644)
    }

    pub fn file_with_mode(
        mut self,
        path: impl AsRef<Path>,
        data: impl AsRef<[u8]>,
        mode: u32,
    ) -> Self {
        self.entries.insert(
            normalize(path.as_ref()),
            MemEntry::File {
                data: Arc::from(data.as_ref()),
                mode,
            },
        );
        self
    }

    pub fn dir(mut self, path: impl AsRef<Path>) -> Self {
        self.entries.insert(normalize(path.as_ref()), MemEntry::Dir);
        self
    }

    fn entry(&self, path: &Path) -> io::Result<&MemEntry> {
        self.entries.get(&normalize(path)).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{}: not found", path.display()),
            )
        })
    }
}

impl FileSystem for MemFs {
    fn stat(&self, path: &Path) -> io::Result<FileStat> {
        Ok(match self.entry(path)? {
            MemEntry::File { mode, .. } => FileStat {
                is_dir: false,
                mode: *mode,
            },
            MemEntry::Dir => FileStat {
                is_dir: true,
                mode: 0o755,
            },
        })
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + Send>> {
        match self.entry(path)? {
            MemEntry::File { data, .. } => Ok(Box::new(Cursor::new(Arc::clone(data)))),
            MemEntry::Dir => Err(io::Error::other(format!(
                "{}: is a directory",
                path.display()
            ))),
        }
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}
