// src/config/validate.rs

use std::path::PathBuf;
use std::time::Duration;

use crate::config::model::{
    CommandSettings, ConfigFile, MonitorSettings, RawCommandSection, RawConfigFile,
    RawMonitorSection, DEFAULT_DIR, DEFAULT_INCLUDES, DEFAULT_INTERVAL_SECS,
};
use crate::errors::{DirpollError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::DirpollError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let monitor = monitor_settings(raw.monitor)?;
        let command = command_settings(raw.command)?;
        Ok(ConfigFile::new_unchecked(monitor, command))
    }
}

fn monitor_settings(raw: RawMonitorSection) -> Result<MonitorSettings> {
    let interval_secs = raw.interval.unwrap_or(DEFAULT_INTERVAL_SECS);
    if interval_secs == 0 {
        return Err(DirpollError::ConfigError(
            "[monitor].interval must be >= 1 second (got 0)".to_string(),
        ));
    }

    let root_dir = raw.dir.unwrap_or_else(|| PathBuf::from(DEFAULT_DIR));
    if root_dir.as_os_str().is_empty() {
        return Err(DirpollError::ConfigError(
            "[monitor].dir must not be empty".to_string(),
        ));
    }

    Ok(MonitorSettings {
        root_dir,
        interval: Duration::from_secs(interval_secs),
        no_traverse: raw.no_traverse.unwrap_or(false),
        includes: raw.includes.unwrap_or_else(|| DEFAULT_INCLUDES.to_string()),
        excludes: raw.excludes.unwrap_or_default(),
        compare_mtime: raw.compare_mtime.unwrap_or(false),
    })
}

fn command_settings(raw: RawCommandSection) -> Result<CommandSettings> {
    let command = match raw.run {
        Some(cmd) if !cmd.trim().is_empty() => cmd,
        _ => {
            return Err(DirpollError::ConfigError(
                "a command is required (--command or [command].run)".to_string(),
            ));
        }
    };

    let timeout = match raw.timeout {
        Some(0) => {
            return Err(DirpollError::ConfigError(
                "[command].timeout must be >= 1 second (got 0)".to_string(),
            ));
        }
        Some(secs) => Some(Duration::from_secs(secs)),
        None => None,
    };

    Ok(CommandSettings {
        command,
        working_dir: raw.cd.filter(|d| !d.as_os_str().is_empty()),
        timeout,
        on_failure: raw.on_failure.unwrap_or_default(),
    })
}

/// Check settings that were built directly rather than through a config file.
pub fn validate_monitor_settings(settings: &MonitorSettings) -> Result<()> {
    if settings.interval.is_zero() {
        return Err(DirpollError::ConfigError(
            "monitor interval must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FailurePolicy;

    fn with_command(cmd: &str) -> RawConfigFile {
        RawConfigFile {
            command: RawCommandSection {
                run: Some(cmd.to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn defaults_match_the_classic_flags() {
        let cfg = ConfigFile::try_from(with_command("make")).unwrap();
        let monitor = cfg.monitor();
        assert_eq!(monitor.root_dir, PathBuf::from("./"));
        assert_eq!(monitor.interval, Duration::from_secs(5));
        assert_eq!(monitor.includes, "*");
        assert_eq!(monitor.excludes, "");
        assert!(!monitor.no_traverse);
        assert_eq!(cfg.command().on_failure, FailurePolicy::Continue);
        assert_eq!(cfg.command().working_dir, None);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut raw = with_command("make");
        raw.monitor.interval = Some(0);
        match ConfigFile::try_from(raw) {
            Err(DirpollError::ConfigError(msg)) => assert!(msg.contains("interval")),
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn missing_or_blank_command_is_rejected() {
        assert!(matches!(
            ConfigFile::try_from(RawConfigFile::default()),
            Err(DirpollError::ConfigError(_))
        ));
        assert!(matches!(
            ConfigFile::try_from(with_command("   ")),
            Err(DirpollError::ConfigError(_))
        ));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut raw = with_command("make");
        raw.command.timeout = Some(0);
        assert!(matches!(
            ConfigFile::try_from(raw),
            Err(DirpollError::ConfigError(_))
        ));
    }

    #[test]
    fn directly_built_settings_need_a_positive_interval() {
        let mut settings = MonitorSettings::new(".");
        assert!(validate_monitor_settings(&settings).is_ok());
        settings.interval = Duration::ZERO;
        assert!(validate_monitor_settings(&settings).is_err());
    }
}
