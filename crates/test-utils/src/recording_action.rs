use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use dirpoll::errors::{DirpollError, Result};
use dirpoll::exec::ReactorAction;

/// What a `RecordingAction` was asked to do, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    ChangesFound,
    NoChanges,
}

/// A fake action that:
/// - records every decision the reactor made
/// - optionally fails on `on_changes_found`.
#[derive(Debug, Clone, Default)]
pub struct RecordingAction {
    reactions: Arc<Mutex<Vec<Reaction>>>,
    fail_on_changes: bool,
}

impl RecordingAction {
    pub fn new() -> Self {
        Self::default()
    }

    /// An action whose `on_changes_found` always returns an error.
    pub fn failing() -> Self {
        Self {
            fail_on_changes: true,
            ..Self::default()
        }
    }

    /// Shared view of the recorded reactions; stays valid after the action
    /// has been moved into a reactor.
    pub fn log(&self) -> Arc<Mutex<Vec<Reaction>>> {
        Arc::clone(&self.reactions)
    }

    fn record(&self, reaction: Reaction) {
        self.reactions.lock().unwrap().push(reaction);
    }
}

impl ReactorAction for RecordingAction {
    fn on_changes_found(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            self.record(Reaction::ChangesFound);
            if self.fail_on_changes {
                return Err(DirpollError::Command("recording action told to fail".into()));
            }
            Ok(())
        })
    }

    fn on_no_changes_found(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            self.record(Reaction::NoChanges);
            Ok(())
        })
    }
}
