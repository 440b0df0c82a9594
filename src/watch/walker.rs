// src/watch/walker.rs

//! Recursive walk-and-diff of a directory tree against the snapshot cache.
//!
//! One call to [`TreeWalker::walk`] is one pass over the tree. Every entry is
//! classified as new / modified / removed / unchanged relative to the cache,
//! the cache is updated in place, and one [`ChangeEvent`] per detected change
//! is handed to a [`ChangeSink`].
//!
//! Order of a pass (depth-first, children in sorted name order):
//! - excluded entries are pruned together with their subtree;
//! - a directory's children are visited before the directory itself is
//!   checked, so child changes are reported first;
//! - files are compared by size (and optionally mtime) only.

use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, trace};

use crate::errors::{DirpollError, Result};
use crate::fs::{EntryMetadata, FileSystem};
use crate::types::ChangeEvent;
use crate::watch::cache::SnapshotCache;
use crate::watch::patterns::PathFilter;

/// Receives the change events produced by a walk.
pub trait ChangeSink {
    fn emit(&mut self, event: ChangeEvent);
}

impl ChangeSink for Vec<ChangeEvent> {
    fn emit(&mut self, event: ChangeEvent) {
        self.push(event);
    }
}

/// Sink used by the warm-up walk: populates the cache, reports nothing.
#[derive(Debug, Default)]
pub struct DiscardSink;

impl ChangeSink for DiscardSink {
    fn emit(&mut self, event: ChangeEvent) {
        trace!(%event, "discarding warm-up event");
    }
}

/// Knobs that change how entries are classified.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkOptions {
    /// Only look at the root's immediate entries.
    pub no_traverse: bool,
    /// Treat an mtime change as a modification even when the size is equal.
    pub compare_mtime: bool,
}

/// A single pass over the tree, borrowing the monitor's state.
pub struct TreeWalker<'a> {
    fs: &'a dyn FileSystem,
    filter: &'a PathFilter,
    cache: &'a mut SnapshotCache,
    options: WalkOptions,
}

impl<'a> TreeWalker<'a> {
    pub fn new(
        fs: &'a dyn FileSystem,
        filter: &'a PathFilter,
        cache: &'a mut SnapshotCache,
        options: WalkOptions,
    ) -> Self {
        Self {
            fs,
            filter,
            cache,
            options,
        }
    }

    /// Walk the tree rooted at `root`.
    ///
    /// The root itself is never excluded. Any filesystem error other than a
    /// `NotFound` during the removed-item check aborts the pass.
    pub fn walk(&mut self, root: &Path, sink: &mut dyn ChangeSink) -> Result<()> {
        debug!("processing directory {:?}", root);
        let meta = self.stat(root)?;
        if meta.is_dir() {
            self.visit_dir(root, meta, true, sink)
        } else {
            if self.filter.is_included(root) {
                self.visit_file(root, meta, sink);
            }
            Ok(())
        }
    }

    fn visit_dir(
        &mut self,
        dir: &Path,
        meta: EntryMetadata,
        is_root: bool,
        sink: &mut dyn ChangeSink,
    ) -> Result<()> {
        if is_root || !self.options.no_traverse {
            for child in self.list(dir)? {
                if self.filter.is_excluded(&child) {
                    debug!("skipping [{:?}]", child);
                    continue;
                }

                let child_meta = self.stat(&child)?;
                if child_meta.is_dir() {
                    self.visit_dir(&child, child_meta, false, sink)?;
                } else if self.filter.is_included(&child) {
                    self.visit_file(&child, child_meta, sink);
                } else {
                    trace!("not included [{:?}]", child);
                }
            }
        }

        self.check_dir(dir, meta, sink)
    }

    fn visit_file(&mut self, path: &Path, meta: EntryMetadata, sink: &mut dyn ChangeSink) {
        match self.cache.get(path).copied() {
            Some(cached) if !cached.is_dir() => {
                if cached.is_modified_by(&meta, self.options.compare_mtime) {
                    sink.emit(ChangeEvent::ModifiedFile {
                        path: path.to_path_buf(),
                    });
                    self.cache.insert(path, meta.into());
                }
            }
            Some(_) => {
                // A directory was replaced by a file of the same name.
                self.cache.remove_subtree(path);
                sink.emit(ChangeEvent::NewFile {
                    path: path.to_path_buf(),
                });
                self.cache.insert(path, meta.into());
            }
            None => {
                sink.emit(ChangeEvent::NewFile {
                    path: path.to_path_buf(),
                });
                self.cache.insert(path, meta.into());
            }
        }
    }

    fn check_dir(
        &mut self,
        dir: &Path,
        meta: EntryMetadata,
        sink: &mut dyn ChangeSink,
    ) -> Result<()> {
        let known_dir = self.cache.get(dir).is_some_and(|cached| cached.is_dir());
        if known_dir {
            return self.check_removed_children(dir, sink);
        }

        sink.emit(ChangeEvent::NewDirectory {
            path: dir.to_path_buf(),
        });
        self.cache.insert(dir, meta.into());
        Ok(())
    }

    /// Report cached children of `dir` that no longer exist.
    ///
    /// When anything was removed the directory's own entry is evicted too, so
    /// the next pass reports `dir` as a new directory again.
    fn check_removed_children(&mut self, dir: &Path, sink: &mut dyn ChangeSink) -> Result<()> {
        let mut removed_any = false;

        for child in self.cache.children_of(dir) {
            match self.fs.metadata(&child) {
                Ok(_) => {}
                Err(err) if err.kind() == ErrorKind::NotFound => {
                    sink.emit(ChangeEvent::RemovedItem {
                        path: child.clone(),
                    });
                    self.cache.remove_subtree(&child);
                    removed_any = true;
                }
                Err(err) => return Err(DirpollError::walk(child, err)),
            }
        }

        if removed_any {
            self.cache.remove(dir);
        }
        Ok(())
    }

    fn stat(&self, path: &Path) -> Result<EntryMetadata> {
        self.fs
            .metadata(path)
            .map_err(|err| DirpollError::walk(path, err))
    }

    fn list(&self, dir: &Path) -> Result<Vec<std::path::PathBuf>> {
        let mut children = self
            .fs
            .read_dir(dir)
            .map_err(|err| DirpollError::walk(dir, err))?;
        children.sort();
        Ok(children)
    }
}
