use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

/// A single change detected by the directory monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    NewFile { path: PathBuf },
    ModifiedFile { path: PathBuf },
    NewDirectory { path: PathBuf },
    /// A previously seen file or directory no longer exists.
    RemovedItem { path: PathBuf },
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeEvent::NewFile { path } => write!(f, "Found new file: {}", path.display()),
            ChangeEvent::ModifiedFile { path } => {
                write!(f, "Found modified file: {}", path.display())
            }
            ChangeEvent::NewDirectory { path } => {
                write!(f, "Found new directory: {}", path.display())
            }
            ChangeEvent::RemovedItem { path } => {
                write!(f, "Found removed file or directory: {}", path.display())
            }
        }
    }
}

/// Message on the monitor → reactor channel.
///
/// `Start` and `End` bracket one polling cycle; every `Change` sent by the
/// monitor sits strictly between a matching pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleMessage {
    Start,
    Change(ChangeEvent),
    End,
}

impl fmt::Display for CycleMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleMessage::Start => f.write_str("--- STARTING TO MONITOR FOR CHANGES ---"),
            CycleMessage::Change(event) => event.fmt(f),
            CycleMessage::End => f.write_str("--- DONE MONITORING CHANGES ---"),
        }
    }
}

/// What the reactor concluded about one completed cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    ChangesFound { count: usize },
    NoChanges,
}

/// What the reactor does when its action fails.
///
/// - `Continue`: log the failure and keep consuming cycles (default).
/// - `Exit`: stop the reactor with the error and request shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    Continue,
    Exit,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        FailurePolicy::Continue
    }
}
