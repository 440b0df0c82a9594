// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running the configured command,
//! using `tokio::process::Command`, when the reactor decides a cycle found
//! changes.
//!
//! - [`backend`] provides the `ReactorAction` trait and the concrete
//!   `CommandAction` used in production, which tests can replace.
//! - [`task_runner`] spawns one command process and collects its output.

pub mod backend;
pub mod task_runner;

pub use backend::{CommandAction, ReactorAction};
pub use task_runner::{run_command, CommandOutput};
