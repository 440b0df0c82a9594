// src/logging.rs

//! Logging setup for `dirpoll` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `-v` (debug) / `-vv` (trace)
//! 3. `DIRPOLL_LOG` environment variable (e.g. "info", "debug")
//! 4. default to `info`
//!
//! Logs are sent to STDERR so that command stdout stays readable.

use anyhow::Result;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>, verbosity: u8) -> Result<()> {
    let level = effective_level(cli_level, verbosity, std::env::var("DIRPOLL_LOG").ok());

    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise logging: {e}"))?;

    Ok(())
}

fn effective_level(
    cli_level: Option<LogLevel>,
    verbosity: u8,
    env_value: Option<String>,
) -> tracing::Level {
    if let Some(lvl) = cli_level {
        return lvl.into();
    }
    match verbosity {
        0 => env_value
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(tracing::Level::INFO),
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(lvl: LogLevel) -> Self {
        match lvl {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_level_wins_over_verbosity_and_env() {
        let level = effective_level(Some(LogLevel::Warn), 2, Some("trace".into()));
        assert_eq!(level, tracing::Level::WARN);
    }

    #[test]
    fn verbosity_flags_map_to_debug_and_trace() {
        assert_eq!(effective_level(None, 1, None), tracing::Level::DEBUG);
        assert_eq!(effective_level(None, 2, None), tracing::Level::TRACE);
    }

    #[test]
    fn env_value_is_used_last_and_falls_back_to_info() {
        assert_eq!(
            effective_level(None, 0, Some(" Debug ".into())),
            tracing::Level::DEBUG
        );
        assert_eq!(
            effective_level(None, 0, Some("bogus".into())),
            tracing::Level::INFO
        );
    }
}
