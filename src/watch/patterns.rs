// src/watch/patterns.rs

use std::ffi::OsStr;
use std::fmt;
use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{trace, warn};

/// A compiled list of comma-separated shell-style globs, matched against the
/// basename of a path only.
///
/// ```text
/// "*.rs, *.toml"   -> matches "main.rs" and "Cargo.toml"
/// "target,.git"    -> matches directories named "target" or ".git"
/// ```
///
/// A pattern that fails to compile is dropped (with a warning) and therefore
/// never matches; the remaining patterns still apply.
#[derive(Clone)]
pub struct NamePatterns {
    patterns: Vec<String>,
    set: GlobSet,
}

impl fmt::Debug for NamePatterns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NamePatterns").field(&self.patterns).finish()
    }
}

impl NamePatterns {
    /// Parse a comma-separated pattern list. Whitespace around each pattern is
    /// trimmed and empty segments are ignored, so `""` yields an empty set.
    pub fn parse(spec: &str) -> Self {
        let mut builder = GlobSetBuilder::new();
        let mut patterns = Vec::new();

        for pat in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match Glob::new(pat) {
                Ok(glob) => {
                    builder.add(glob);
                    patterns.push(pat.to_string());
                }
                Err(err) => {
                    warn!(pattern = %pat, error = %err, "ignoring malformed glob pattern");
                }
            }
        }

        let set = builder.build().unwrap_or_else(|err| {
            warn!(error = %err, "failed to compile glob set; no pattern will match");
            GlobSet::empty()
        });

        Self { patterns, set }
    }

    /// The patterns that compiled successfully, in input order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Returns true if the basename of `path` matches at least one pattern.
    pub fn matches_basename(&self, path: &Path) -> bool {
        let name = basename(path);
        let matched = self.set.is_match(name);
        trace!(?name, matched, patterns = ?self.patterns, "basename pattern check");
        matched
    }
}

/// Final path component, or the whole path when there is none (e.g. `"."`).
fn basename(path: &Path) -> &OsStr {
    path.file_name().unwrap_or(path.as_os_str())
}

/// Include / exclude rules used by the walker.
#[derive(Debug, Clone)]
pub struct PathFilter {
    includes: NamePatterns,
    excludes: NamePatterns,
}

impl PathFilter {
    pub fn new(includes: &str, excludes: &str) -> Self {
        Self {
            includes: NamePatterns::parse(includes),
            excludes: NamePatterns::parse(excludes),
        }
    }

    /// Files are reported only when their basename matches an include glob.
    pub fn is_included(&self, path: &Path) -> bool {
        self.includes.matches_basename(path)
    }

    /// Excluded entries are pruned together with their whole subtree.
    /// No exclude patterns means nothing is excluded.
    pub fn is_excluded(&self, path: &Path) -> bool {
        !self.excludes.is_empty() && self.excludes.matches_basename(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_against_basename_only() {
        let patterns = NamePatterns::parse("keep.txt");
        assert!(patterns.matches_basename(Path::new("a/b/keep.txt")));
        assert!(patterns.matches_basename(Path::new("keep.txt")));
        assert!(!patterns.matches_basename(Path::new("keep.txt/other")));
    }

    #[test]
    fn comma_separated_list_with_whitespace() {
        let patterns = NamePatterns::parse(" *.rs , *.toml,,");
        assert_eq!(patterns.patterns(), &["*.rs".to_string(), "*.toml".to_string()]);
        assert!(patterns.matches_basename(Path::new("src/main.rs")));
        assert!(patterns.matches_basename(Path::new("Cargo.toml")));
        assert!(!patterns.matches_basename(Path::new("README.md")));
    }

    #[test]
    fn shell_style_wildcards_and_classes() {
        let patterns = NamePatterns::parse("file?.log,[abc]*.txt");
        assert!(patterns.matches_basename(Path::new("file1.log")));
        assert!(!patterns.matches_basename(Path::new("file10.log")));
        assert!(patterns.matches_basename(Path::new("b-notes.txt")));
        assert!(!patterns.matches_basename(Path::new("d-notes.txt")));
    }

    #[test]
    fn malformed_pattern_never_matches_but_others_still_do() {
        let patterns = NamePatterns::parse("[unclosed,*.txt");
        assert_eq!(patterns.patterns(), &["*.txt".to_string()]);
        assert!(patterns.matches_basename(Path::new("a.txt")));
        assert!(!patterns.matches_basename(Path::new("[unclosed")));
    }

    #[test]
    fn empty_exclude_excludes_nothing() {
        let filter = PathFilter::new("*", "");
        assert!(!filter.is_excluded(Path::new("anything")));
        assert!(filter.is_included(Path::new("anything")));
    }

    #[test]
    fn exclude_matches_directory_names() {
        let filter = PathFilter::new("*", "target,.git");
        assert!(filter.is_excluded(Path::new("./project/target")));
        assert!(filter.is_excluded(Path::new(".git")));
        assert!(!filter.is_excluded(Path::new("./project/src")));
    }
}
