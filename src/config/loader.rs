// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::cli::CliArgs;
use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** apply defaults or
/// validate anything. Use [`load_and_validate`] or [`resolve`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Build the effective configuration for a CLI invocation.
///
/// Precedence, highest first:
/// - explicit CLI flags
/// - the `--config` TOML file (if given)
/// - built-in defaults
pub fn resolve(args: &CliArgs) -> Result<ConfigFile> {
    let mut raw = match &args.config {
        Some(path) => load_from_path(path)?,
        None => RawConfigFile::default(),
    };
    apply_cli_overrides(&mut raw, args);
    ConfigFile::try_from(raw)
}

/// Layer CLI flags over a raw config. Boolean flags can only switch
/// options on.
pub fn apply_cli_overrides(raw: &mut RawConfigFile, args: &CliArgs) {
    let monitor = &mut raw.monitor;
    if let Some(dir) = &args.dir {
        monitor.dir = Some(dir.clone());
    }
    if let Some(interval) = args.interval {
        monitor.interval = Some(interval);
    }
    if args.no_traverse {
        monitor.no_traverse = Some(true);
    }
    if let Some(includes) = &args.includes {
        monitor.includes = Some(includes.clone());
    }
    if let Some(excludes) = &args.excludes {
        monitor.excludes = Some(excludes.clone());
    }
    if args.compare_mtime {
        monitor.compare_mtime = Some(true);
    }

    let command = &mut raw.command;
    if let Some(cmd) = &args.command {
        command.run = Some(cmd.clone());
    }
    if let Some(cd) = &args.cd {
        command.cd = Some(cd.clone());
    }
    if let Some(timeout) = args.timeout {
        command.timeout = Some(timeout);
    }
    if let Some(policy) = args.on_failure {
        command.on_failure = Some(policy.into());
    }
}
