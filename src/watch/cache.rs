// src/watch/cache.rs

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

use crate::fs::{EntryKind, EntryMetadata};

/// What the monitor remembers about one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheEntry {
    pub kind: EntryKind,
    pub size: u64,
    /// Only compared when mtime comparison is switched on.
    pub modified: Option<SystemTime>,
}

impl CacheEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    /// Whether `current` counts as a modification of this entry.
    ///
    /// Size is always compared. Content edits that keep the size identical are
    /// invisible unless `compare_mtime` is set.
    pub fn is_modified_by(&self, current: &EntryMetadata, compare_mtime: bool) -> bool {
        if self.size != current.size {
            return true;
        }
        compare_mtime && self.modified != current.modified
    }
}

impl From<EntryMetadata> for CacheEntry {
    fn from(meta: EntryMetadata) -> Self {
        Self {
            kind: meta.kind,
            size: meta.size,
            modified: meta.modified,
        }
    }
}

/// In-memory snapshot of the monitored tree: path → last seen metadata.
///
/// Owned by a single `DirectoryMonitor` and only touched from its task.
///
/// Next to the entries it keeps a parent → children index, so listing the
/// cached children of one directory costs as much as that directory and not
/// the whole tree. The index may link a path whose own entry was evicted
/// while its descendants are still cached; `children_of` skips those links
/// and `remove_subtree` follows them.
#[derive(Debug, Default)]
pub struct SnapshotCache {
    entries: HashMap<PathBuf, CacheEntry>,
    children: HashMap<PathBuf, BTreeSet<PathBuf>>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &Path) -> Option<&CacheEntry> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or replace the entry for `path`.
    pub fn insert(&mut self, path: &Path, entry: CacheEntry) {
        self.entries.insert(path.to_path_buf(), entry);
        if let Some(parent) = path.parent() {
            self.children
                .entry(parent.to_path_buf())
                .or_default()
                .insert(path.to_path_buf());
        }
    }

    /// Evict a single entry. Cached descendants stay reachable.
    pub fn remove(&mut self, path: &Path) {
        if self.entries.remove(path).is_some() {
            debug!("evicted cache entry for {:?}", path);
        }
        let has_children = self.children.get(path).is_some_and(|c| !c.is_empty());
        if !has_children {
            self.children.remove(path);
            self.unlink(path);
        }
    }

    /// Evict `path` and every entry beneath it.
    pub fn remove_subtree(&mut self, path: &Path) {
        self.unlink(path);

        let mut evicted = 0usize;
        let mut pending = vec![path.to_path_buf()];
        while let Some(next) = pending.pop() {
            if self.entries.remove(&next).is_some() {
                evicted += 1;
            }
            if let Some(kids) = self.children.remove(&next) {
                pending.extend(kids);
            }
        }

        if evicted > 0 {
            debug!(evicted, "evicted cache subtree for {:?}", path);
        }
    }

    /// Cached paths whose parent is `dir`, sorted.
    pub fn children_of(&self, dir: &Path) -> Vec<PathBuf> {
        self.children
            .get(dir)
            .map(|kids| {
                kids.iter()
                    .filter(|p| self.entries.contains_key(*p))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All cached paths, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.entries.keys().cloned().collect();
        paths.sort();
        paths
    }

    fn unlink(&mut self, path: &Path) {
        let Some(parent) = path.parent() else {
            return;
        };
        if let Some(siblings) = self.children.get_mut(parent) {
            siblings.remove(path);
            if siblings.is_empty() {
                self.children.remove(parent);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(size: u64) -> CacheEntry {
        CacheEntry {
            kind: EntryKind::File,
            size,
            modified: None,
        }
    }

    fn dir() -> CacheEntry {
        CacheEntry {
            kind: EntryKind::Dir,
            size: 0,
            modified: None,
        }
    }

    #[test]
    fn children_of_returns_only_immediate_children() {
        let mut cache = SnapshotCache::new();
        cache.insert(Path::new("root"), dir());
        cache.insert(Path::new("root/b.txt"), file(1));
        cache.insert(Path::new("root/a.txt"), file(1));
        cache.insert(Path::new("root/sub"), dir());
        cache.insert(Path::new("root/sub/deep.txt"), file(1));

        assert_eq!(
            cache.children_of(Path::new("root")),
            vec![
                PathBuf::from("root/a.txt"),
                PathBuf::from("root/b.txt"),
                PathBuf::from("root/sub"),
            ]
        );
    }

    #[test]
    fn remove_subtree_keeps_siblings_with_common_prefix() {
        let mut cache = SnapshotCache::new();
        cache.insert(Path::new("root/sub"), dir());
        cache.insert(Path::new("root/sub/x"), file(1));
        cache.insert(Path::new("root/subway"), file(1));

        cache.remove_subtree(Path::new("root/sub"));

        assert_eq!(cache.paths(), vec![PathBuf::from("root/subway")]);
    }

    #[test]
    fn size_is_compared_and_mtime_only_on_request() {
        let t0 = SystemTime::UNIX_EPOCH;
        let t1 = t0 + std::time::Duration::from_secs(5);
        let cached = CacheEntry {
            kind: EntryKind::File,
            size: 10,
            modified: Some(t0),
        };
        let same_size_newer = EntryMetadata {
            kind: EntryKind::File,
            size: 10,
            modified: Some(t1),
        };
        let bigger = EntryMetadata {
            size: 20,
            ..same_size_newer
        };

        assert!(!cached.is_modified_by(&same_size_newer, false));
        assert!(cached.is_modified_by(&same_size_newer, true));
        assert!(cached.is_modified_by(&bigger, false));
    }

    #[test]
    fn evicted_directory_keeps_its_children_reachable() {
        let mut cache = SnapshotCache::new();
        cache.insert(Path::new("root"), dir());
        cache.insert(Path::new("root/sub"), dir());
        cache.insert(Path::new("root/sub/a.txt"), file(1));

        // Only the directory's own entry goes.
        cache.remove(Path::new("root/sub"));
        assert!(cache.children_of(Path::new("root")).is_empty());
        assert_eq!(
            cache.children_of(Path::new("root/sub")),
            vec![PathBuf::from("root/sub/a.txt")]
        );

        // Removing the parent's subtree still reaches the orphaned file.
        cache.remove_subtree(Path::new("root"));
        assert!(cache.is_empty());
        assert!(cache.children_of(Path::new("root/sub")).is_empty());
    }

    #[test]
    fn re_inserted_directory_is_listed_again() {
        let mut cache = SnapshotCache::new();
        cache.insert(Path::new("root/sub"), dir());
        cache.insert(Path::new("root/sub/a.txt"), file(1));
        cache.remove(Path::new("root/sub"));
        cache.insert(Path::new("root/sub"), dir());

        assert_eq!(
            cache.children_of(Path::new("root")),
            vec![PathBuf::from("root/sub")]
        );
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn large_flat_directory_lists_in_order() {
        let mut cache = SnapshotCache::new();
        for i in (0..500).rev() {
            cache.insert(&PathBuf::from(format!("root/d{i:03}")), dir());
            cache.insert(&PathBuf::from(format!("root/d{i:03}/f.txt")), file(i));
        }

        let kids = cache.children_of(Path::new("root"));
        assert_eq!(kids.len(), 500);
        assert!(kids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(
            cache.children_of(Path::new("root/d042")),
            vec![PathBuf::from("root/d042/f.txt")]
        );
    }
}
