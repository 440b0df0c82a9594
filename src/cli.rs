// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

use crate::types::FailurePolicy;

/// Command-line arguments for `dirpoll`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "dirpoll",
    version,
    about = "Poll a directory tree and run a command when something changes.",
    long_about = None
)]
pub struct CliArgs {
    /// Optional TOML config file. CLI flags override its values.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory to monitor (default `./`).
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Polling interval in seconds (default 5).
    #[arg(long, value_name = "SECS")]
    pub interval: Option<u64>,

    /// Only scan the top-level directory, not the entire tree.
    #[arg(long)]
    pub no_traverse: bool,

    /// File name patterns (no dir info) to include in the scan, comma separated.
    #[arg(long, value_name = "PATTERNS")]
    pub includes: Option<String>,

    /// File or directory name patterns to exclude from the scan, comma separated.
    #[arg(long, value_name = "PATTERNS")]
    pub excludes: Option<String>,

    /// Also treat a changed modification time as a change.
    #[arg(long)]
    pub compare_mtime: bool,

    /// Directory to run the command from.
    #[arg(long, value_name = "DIR")]
    pub cd: Option<PathBuf>,

    /// Command to run upon finding a change in the monitored tree.
    #[arg(long, value_name = "CMD")]
    pub command: Option<String>,

    /// Kill the command if it runs longer than this many seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// What to do when the command fails.
    #[arg(long, value_enum, value_name = "POLICY")]
    pub on_failure: Option<OnFailure>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `-v`/`-vv`, then `DIRPOLL_LOG`, then `info` are used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// `-v` for debug output, `-vv` for trace output.
    #[arg(short = 'v', action = ArgAction::Count)]
    pub verbose: u8,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Command failure policy as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum OnFailure {
    Continue,
    Exit,
}

impl From<OnFailure> for FailurePolicy {
    fn from(value: OnFailure) -> Self {
        match value {
            OnFailure::Continue => FailurePolicy::Continue,
            OnFailure::Exit => FailurePolicy::Exit,
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
