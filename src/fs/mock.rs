// src/fs/mock.rs

use super::{EntryKind, EntryMetadata, FileSystem};
use std::collections::HashMap;
use std::io::{self, ErrorKind};
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File { size: u64, modified: SystemTime },
    Dir(Vec<String>), // List of child names
}

#[derive(Debug, Default)]
struct MockState {
    entries: HashMap<PathBuf, MockEntry>,
    failures: HashMap<PathBuf, ErrorKind>,
    /// Logical clock used as the modification time of writes.
    clock: u64,
}

/// In-memory filesystem for deterministic walker tests.
///
/// Paths are normalised by dropping `.` components, so `"./a.txt"` and
/// `"a.txt"` name the same entry and the root is `"."`. Cloning shares state.
#[derive(Debug, Clone)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut state = MockState::default();
        // Ensure root exists
        state
            .entries
            .insert(PathBuf::from("."), MockEntry::Dir(Vec::new()));

        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Create or overwrite a file. Its size is `content.len()` and its
    /// modification time advances on every write.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl AsRef<[u8]>) {
        let path = normalize(path.as_ref());
        let mut state = self.lock();
        state.clock += 1;
        let modified = UNIX_EPOCH + Duration::from_secs(state.clock);
        let size = content.as_ref().len() as u64;
        state
            .entries
            .insert(path.clone(), MockEntry::File { size, modified });
        link_into_parent(&mut state, &path);
    }

    /// Create a directory (and any missing parents).
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = normalize(path.as_ref());
        let mut state = self.lock();
        ensure_dir_entry(&mut state, &path);
    }

    /// Remove an entry and everything beneath it.
    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = normalize(path.as_ref());
        let mut state = self.lock();
        state.entries.retain(|p, _| !p.starts_with(&path));
        if let (Some(parent), Some(name)) = (parent_of(&path), path.file_name()) {
            if let Some(MockEntry::Dir(children)) = state.entries.get_mut(&parent) {
                let name = name.to_string_lossy();
                children.retain(|c| c.as_str() != name.as_ref());
            }
        }
    }

    /// Make every `metadata` / `read_dir` call on `path` fail with `kind`.
    pub fn fail_with(&self, path: impl AsRef<Path>, kind: ErrorKind) {
        let path = normalize(path.as_ref());
        self.lock().failures.insert(path, kind);
    }

    pub fn clear_failure(&self, path: impl AsRef<Path>) {
        let path = normalize(path.as_ref());
        self.lock().failures.remove(&path);
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        // A poisoned mock only happens after a test already panicked.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl FileSystem for MockFileSystem {
    fn metadata(&self, path: &Path) -> io::Result<EntryMetadata> {
        let key = normalize(path);
        let state = self.lock();
        check_failure(&state, &key)?;
        match state.entries.get(&key) {
            Some(MockEntry::File { size, modified }) => Ok(EntryMetadata {
                kind: EntryKind::File,
                size: *size,
                modified: Some(*modified),
            }),
            Some(MockEntry::Dir(_)) => Ok(EntryMetadata {
                kind: EntryKind::Dir,
                size: 0,
                modified: None,
            }),
            None => Err(not_found(path)),
        }
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let key = normalize(path);
        let state = self.lock();
        check_failure(&state, &key)?;
        match state.entries.get(&key) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            Some(MockEntry::File { .. }) => Err(io::Error::new(
                ErrorKind::Other,
                format!("Not a directory: {:?}", path),
            )),
            None => Err(not_found(path)),
        }
    }
}

fn normalize(path: &Path) -> PathBuf {
    let normalized: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

fn parent_of(path: &Path) -> Option<PathBuf> {
    if path == Path::new(".") {
        return None;
    }
    path.parent().map(normalize)
}

fn ensure_dir_entry(state: &mut MockState, path: &Path) {
    if state.entries.contains_key(path) {
        return;
    }
    state
        .entries
        .insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
    link_into_parent(state, path);
}

fn link_into_parent(state: &mut MockState, path: &Path) {
    let Some(parent) = parent_of(path) else {
        return;
    };
    ensure_dir_entry(state, &parent);
    if let Some(MockEntry::Dir(children)) = state.entries.get_mut(&parent) {
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if !children.iter().any(|c| c == name) {
                children.push(name.to_string());
            }
        }
    }
}

fn check_failure(state: &MockState, key: &Path) -> io::Result<()> {
    match state.failures.get(key) {
        Some(kind) => Err(io::Error::new(
            *kind,
            format!("injected failure for {:?}", key),
        )),
        None => Ok(()),
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(ErrorKind::NotFound, format!("File not found: {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_dir_lists_children_under_the_given_prefix() {
        let fs = MockFileSystem::new();
        fs.add_file("a.txt", b"0123456789");
        fs.add_file("sub/b.txt", b"x");

        let mut listed = fs.read_dir(Path::new(".")).unwrap();
        listed.sort();
        assert_eq!(listed, vec![PathBuf::from("./a.txt"), PathBuf::from("./sub")]);

        let meta = fs.metadata(Path::new("./a.txt")).unwrap();
        assert_eq!(meta.size, 10);
        assert!(fs.metadata(Path::new("./sub")).unwrap().is_dir());
    }

    #[test]
    fn remove_drops_subtree_and_parent_link() {
        let fs = MockFileSystem::new();
        fs.add_file("sub/deep/c.txt", b"c");
        fs.remove("sub");

        assert!(fs.read_dir(Path::new(".")).unwrap().is_empty());
        let err = fs.metadata(Path::new("sub/deep/c.txt")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn injected_failures_surface_until_cleared() {
        let fs = MockFileSystem::new();
        fs.add_dir("locked");
        fs.fail_with("locked", ErrorKind::PermissionDenied);

        let err = fs.read_dir(Path::new("./locked")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);

        fs.clear_failure("locked");
        assert!(fs.read_dir(Path::new("./locked")).unwrap().is_empty());
    }

    #[test]
    fn rewriting_a_file_advances_its_mtime() {
        let fs = MockFileSystem::new();
        fs.add_file("a.txt", b"one");
        let first = fs.metadata(Path::new("a.txt")).unwrap();
        fs.add_file("a.txt", b"two");
        let second = fs.metadata(Path::new("a.txt")).unwrap();

        assert_eq!(first.size, second.size);
        assert_ne!(first.modified, second.modified);
    }
}
