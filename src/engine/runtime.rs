// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::errors::Result;
use crate::exec::ReactorAction;
use crate::types::{CycleMessage, CycleOutcome, FailurePolicy};

use super::core::CycleTracker;

/// Consumes the monitor's channel and turns each completed cycle into exactly
/// one call on a `ReactorAction`.
///
/// This is a thin IO shell around `CycleTracker`, which holds the per-cycle
/// state.
pub struct ChangeReactor<A: ReactorAction> {
    tracker: CycleTracker,
    rx: mpsc::Receiver<CycleMessage>,
    action: A,
    on_failure: FailurePolicy,
}

impl<A: ReactorAction> fmt::Debug for ChangeReactor<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeReactor")
            .field("tracker", &self.tracker)
            .field("on_failure", &self.on_failure)
            .finish_non_exhaustive()
    }
}

impl<A: ReactorAction + 'static> ChangeReactor<A> {
    pub fn new(rx: mpsc::Receiver<CycleMessage>, action: A, on_failure: FailurePolicy) -> Self {
        Self {
            tracker: CycleTracker::new(),
            rx,
            action,
            on_failure,
        }
    }

    /// Run the receive loop on its own Tokio task.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<Result<()>> {
        tokio::spawn(self.run(cancel))
    }

    /// Main receive loop.
    ///
    /// Ends cleanly when the channel closes or `cancel` fires. With
    /// `FailurePolicy::Exit` a failing action ends the loop with its error
    /// and cancels `cancel` so the rest of the system shuts down too.
    pub async fn run(mut self, cancel: CancellationToken) -> Result<()> {
        info!("change reactor started");

        loop {
            let msg = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("reactor cancelled; exiting");
                    break;
                }
                msg = self.rx.recv() => match msg {
                    Some(m) => m,
                    None => {
                        info!("change channel closed; exiting");
                        break;
                    }
                },
            };

            let Some(outcome) = self.tracker.step(&msg) else {
                continue;
            };

            if let Err(err) = self.react(outcome).await {
                match self.on_failure {
                    FailurePolicy::Continue => {
                        warn!(error = %err, "reactor action failed; continuing");
                    }
                    FailurePolicy::Exit => {
                        error!(error = %err, "reactor action failed; shutting down");
                        cancel.cancel();
                        return Err(err);
                    }
                }
            }
        }

        info!("reactor exiting");
        Ok(())
    }

    async fn react(&mut self, outcome: CycleOutcome) -> Result<()> {
        match outcome {
            CycleOutcome::ChangesFound { count } => {
                info!(count, "changes found; running action");
                self.action.on_changes_found().await
            }
            CycleOutcome::NoChanges => {
                debug!("cycle finished without changes");
                self.action.on_no_changes_found().await
            }
        }
    }
}
