// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub mod mock;

/// Whether a filesystem entry is a directory or something else.
///
/// Symlinks are never followed, so a link to a directory is a `File` here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
}

/// The subset of filesystem metadata the monitor compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryMetadata {
    pub kind: EntryKind,
    pub size: u64,
    pub modified: Option<SystemTime>,
}

impl EntryMetadata {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// Abstract filesystem interface.
///
/// Errors are plain `io::Error`s so callers can tell `NotFound` apart from
/// everything else.
pub trait FileSystem: Send + Sync + Debug {
    /// Stat `path` without following symlinks.
    fn metadata(&self, path: &Path) -> io::Result<EntryMetadata>;

    /// Return a list of entries in a directory.
    /// Returns full paths (`path.join(name)`).
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn metadata(&self, path: &Path) -> io::Result<EntryMetadata> {
        let meta = fs::symlink_metadata(path)?;
        let kind = if meta.is_dir() {
            EntryKind::Dir
        } else {
            EntryKind::File
        };
        Ok(EntryMetadata {
            kind,
            size: meta.len(),
            modified: meta.modified().ok(),
        })
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            entries.push(entry.path());
        }
        Ok(entries)
    }
}
