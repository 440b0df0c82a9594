// src/watch/mod.rs

//! Polling-based change detection.
//!
//! This module is responsible for:
//! - Compiling the include / exclude basename globs (`patterns`).
//! - Keeping the path → metadata snapshot (`cache`).
//! - Walking the tree and diffing it against the snapshot (`walker`).
//! - Driving walks on an interval and emitting cycles on a channel
//!   (`monitor`).
//!
//! It does **not** decide what to do about changes; that's the reactor's job.

pub mod cache;
pub mod monitor;
pub mod patterns;
pub mod walker;

pub use cache::{CacheEntry, SnapshotCache};
pub use monitor::{DirectoryMonitor, MonitorHandle};
pub use patterns::{NamePatterns, PathFilter};
pub use walker::{ChangeSink, DiscardSink, TreeWalker, WalkOptions};
