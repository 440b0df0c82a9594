#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use dirpoll::config::MonitorSettings;
use tempfile::TempDir;

/// Builder for `MonitorSettings` to simplify test setup.
pub struct MonitorSettingsBuilder {
    settings: MonitorSettings,
}

impl MonitorSettingsBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let mut settings = MonitorSettings::new(root);
        // Tests poll fast; production validation only allows whole seconds.
        settings.interval = Duration::from_millis(20);
        Self { settings }
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.settings.interval = interval;
        self
    }

    pub fn includes(mut self, patterns: &str) -> Self {
        self.settings.includes = patterns.to_string();
        self
    }

    pub fn excludes(mut self, patterns: &str) -> Self {
        self.settings.excludes = patterns.to_string();
        self
    }

    pub fn no_traverse(mut self, val: bool) -> Self {
        self.settings.no_traverse = val;
        self
    }

    pub fn compare_mtime(mut self, val: bool) -> Self {
        self.settings.compare_mtime = val;
        self
    }

    pub fn build(self) -> MonitorSettings {
        self.settings
    }
}

/// A throwaway directory tree on the real filesystem.
pub struct TreeFixture {
    dir: TempDir,
}

impl TreeFixture {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Write `len` bytes to `rel`, creating parent directories.
    pub fn write_len(&self, rel: &str, len: usize) -> PathBuf {
        self.write(rel, &vec![b'x'; len])
    }

    pub fn write(&self, rel: &str, contents: &[u8]) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent dirs");
        }
        fs::write(&path, contents).expect("failed to write file");
        path
    }

    pub fn mkdir(&self, rel: &str) -> PathBuf {
        let path = self.path(rel);
        fs::create_dir_all(&path).expect("failed to create dir");
        path
    }

    pub fn remove(&self, rel: &str) {
        let path = self.path(rel);
        if path.is_dir() {
            fs::remove_dir_all(&path).expect("failed to remove dir");
        } else {
            fs::remove_file(&path).expect("failed to remove file");
        }
    }
}

impl Default for TreeFixture {
    fn default() -> Self {
        Self::new()
    }
}
