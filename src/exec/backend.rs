// src/exec/backend.rs

//! Pluggable reactor action abstraction.
//!
//! The reactor talks to a `ReactorAction` instead of spawning processes
//! itself. This makes it easy to swap in a recording action in tests while
//! keeping the production command runner in [`super::task_runner`].
//!
//! - `CommandAction` is the default implementation used by `dirpoll`.
//!   It runs the configured command once per cycle that found changes.
//! - Tests can provide their own `ReactorAction` that, for example, records
//!   how often it was called.

use std::future::Future;
use std::pin::Pin;

use tracing::debug;

use crate::config::CommandSettings;
use crate::errors::Result;

use super::task_runner::run_command;

/// What the reactor does at the end of each cycle.
pub trait ReactorAction: Send {
    /// Called once for every cycle that contained at least one change.
    fn on_changes_found(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Called once for every cycle that contained no change.
    fn on_no_changes_found(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async {
            debug!("no changes found");
            Ok(())
        })
    }
}

/// Runs the configured external command whenever changes were found.
#[derive(Debug, Clone)]
pub struct CommandAction {
    settings: CommandSettings,
}

impl CommandAction {
    pub fn new(settings: CommandSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &CommandSettings {
        &self.settings
    }
}

impl ReactorAction for CommandAction {
    fn on_changes_found(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            run_command(&self.settings).await?;
            Ok(())
        })
    }
}
