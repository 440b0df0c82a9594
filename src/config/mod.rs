// src/config/mod.rs

//! Configuration loading and validation for dirpoll.
//!
//! Responsibilities:
//! - Define the TOML-backed data model and the validated settings (`model.rs`).
//! - Load a config file from disk and layer CLI flags on top (`loader.rs`).
//! - Validate and apply defaults (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{apply_cli_overrides, load_and_validate, load_from_path, resolve};
pub use model::{
    CommandSettings, ConfigFile, MonitorSettings, RawCommandSection, RawConfigFile,
    RawMonitorSection,
};
pub use validate::validate_monitor_settings;
