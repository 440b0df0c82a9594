// src/config/model.rs

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::types::FailurePolicy;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [monitor]
/// dir = "src"
/// interval = 5
/// includes = "*.rs,*.toml"
/// excludes = "target,.git"
///
/// [command]
/// run = "cargo test"
/// cd = "."
/// ```
///
/// Every field is optional here; CLI flags are layered on top and defaults
/// are applied when converting into a validated [`ConfigFile`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub monitor: RawMonitorSection,

    #[serde(default)]
    pub command: RawCommandSection,
}

/// `[monitor]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawMonitorSection {
    /// Directory tree to poll. Default `./`.
    pub dir: Option<PathBuf>,

    /// Polling interval in seconds. Default 5, must be >= 1.
    pub interval: Option<u64>,

    /// Only scan the root directory's immediate entries.
    pub no_traverse: Option<bool>,

    /// Comma-separated basename globs of files to report. Default `*`.
    pub includes: Option<String>,

    /// Comma-separated basename globs of files or directories to prune.
    pub excludes: Option<String>,

    /// Also treat an mtime change as a modification.
    pub compare_mtime: Option<bool>,
}

/// `[command]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawCommandSection {
    /// Command line run whenever a cycle found changes.
    pub run: Option<String>,

    /// Working directory for the command.
    pub cd: Option<PathBuf>,

    /// Kill the command after this many seconds.
    pub timeout: Option<u64>,

    /// `"continue"` (default) or `"exit"`.
    pub on_failure: Option<FailurePolicy>,
}

pub const DEFAULT_DIR: &str = "./";
pub const DEFAULT_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_INCLUDES: &str = "*";

/// Validated settings for the directory monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorSettings {
    pub root_dir: PathBuf,
    pub interval: Duration,
    pub no_traverse: bool,
    pub includes: String,
    pub excludes: String,
    pub compare_mtime: bool,
}

impl MonitorSettings {
    /// Settings for `root_dir` with every other field at its default.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            no_traverse: false,
            includes: DEFAULT_INCLUDES.to_string(),
            excludes: String::new(),
            compare_mtime: false,
        }
    }
}

impl fmt::Display for MonitorSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Directory [{}]; No Traverse [{}]; Interval [{:?}]; Includes [{}]; Excludes [{}]",
            self.root_dir.display(),
            self.no_traverse,
            self.interval,
            self.includes,
            self.excludes
        )
    }
}

/// Validated settings for the command run on changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSettings {
    pub command: String,
    pub working_dir: Option<PathBuf>,
    pub timeout: Option<Duration>,
    pub on_failure: FailurePolicy,
}

impl CommandSettings {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            working_dir: None,
            timeout: None,
            on_failure: FailurePolicy::default(),
        }
    }
}

impl fmt::Display for CommandSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = self
            .working_dir
            .as_ref()
            .map(|d| d.display().to_string())
            .unwrap_or_default();
        write!(f, "Directory [{}]; Command [{}]", dir, self.command)
    }
}

/// Fully validated configuration.
///
/// Only constructed through `TryFrom<RawConfigFile>`, so holding one means the
/// interval is positive and a command is present.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    monitor: MonitorSettings,
    command: CommandSettings,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(monitor: MonitorSettings, command: CommandSettings) -> Self {
        Self { monitor, command }
    }

    pub fn monitor(&self) -> &MonitorSettings {
        &self.monitor
    }

    pub fn command(&self) -> &CommandSettings {
        &self.command
    }

    pub fn into_parts(self) -> (MonitorSettings, CommandSettings) {
        (self.monitor, self.command)
    }
}
