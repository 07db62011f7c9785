//! Filesystem capability used by the rewriter and the llms.txt writer.
//!
//! [`StdFs`] talks to the real disk. [`MemoryFs`] keeps writes in memory and
//! records every call in order, for tests and dry runs.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

/// The three filesystem operations the generator needs.
pub trait FileSystem {
    /// Read a whole file as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Create a directory and all missing parents. Must succeed if it already exists.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Write `contents`, replacing anything already at `path`.
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
}

/// The real filesystem via `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFs;

impl FileSystem for StdFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        std::fs::write(path, contents)
    }
}

// ---------------------------------------------------------------------------
// MemoryFs
// ---------------------------------------------------------------------------

/// One recorded filesystem call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsCall {
    Read(PathBuf),
    CreateDir(PathBuf),
    Write { path: PathBuf, contents: String },
}

/// In-memory filesystem that records every call.
///
/// Reads are served from files written or seeded into memory. An overlay
/// instance ([`MemoryFs::overlay`]) falls back to the real disk for reads,
/// which is what a dry run needs.
#[derive(Debug, Default)]
pub struct MemoryFs {
    files: RefCell<BTreeMap<PathBuf, String>>,
    dirs: RefCell<BTreeSet<PathBuf>>,
    calls: RefCell<Vec<FsCall>>,
    disk_reads: bool,
    denied: Vec<PathBuf>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// A memory filesystem whose reads fall through to disk.
    pub fn overlay() -> Self {
        Self {
            disk_reads: true,
            ..Self::default()
        }
    }

    /// Seed a file.
    pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.files.borrow_mut().insert(path.into(), contents.into());
        self
    }

    /// Make writes and directory creation under `prefix` fail with `PermissionDenied`.
    pub fn deny_writes(mut self, prefix: impl Into<PathBuf>) -> Self {
        self.denied.push(prefix.into());
        self
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<FsCall> {
        self.calls.borrow().clone()
    }

    /// Every write made so far, in order.
    pub fn writes(&self) -> Vec<(PathBuf, String)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                FsCall::Write { path, contents } => Some((path.clone(), contents.clone())),
                _ => None,
            })
            .collect()
    }

    /// Current contents of a file held in memory.
    pub fn file(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.borrow().get(path.as_ref()).cloned()
    }

    /// Whether a directory has been created.
    pub fn has_dir(&self, path: impl AsRef<Path>) -> bool {
        self.dirs.borrow().contains(path.as_ref())
    }

    fn check_writable(&self, path: &Path) -> io::Result<()> {
        if self.denied.iter().any(|prefix| path.starts_with(prefix)) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("writes denied under {}", path.display()),
            ));
        }
        Ok(())
    }
}

impl FileSystem for MemoryFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.calls.borrow_mut().push(FsCall::Read(path.to_path_buf()));

        if let Some(contents) = self.files.borrow().get(path) {
            return Ok(contents.clone());
        }
        if self.disk_reads {
            return std::fs::read_to_string(path);
        }
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} not found in memory", path.display()),
        ))
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.calls
            .borrow_mut()
            .push(FsCall::CreateDir(path.to_path_buf()));
        self.check_writable(path)?;

        let mut dirs = self.dirs.borrow_mut();
        for ancestor in path.ancestors().filter(|p| !p.as_os_str().is_empty()) {
            dirs.insert(ancestor.to_path_buf());
        }
        Ok(())
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        self.calls.borrow_mut().push(FsCall::Write {
            path: path.to_path_buf(),
            contents: contents.to_string(),
        });
        self.check_writable(path)?;

        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }
}
