// src/engine/core.rs

//! Pure cycle-tracking state machine.
//!
//! [`CycleTracker`] consumes [`CycleMessage`]s one at a time and, on every
//! `End`, returns the [`CycleOutcome`] for the cycle that just closed. It has
//! no channels, no Tokio types and performs no IO, so the async shell in
//! [`super::runtime`] stays trivial.

use tracing::{debug, info, warn};

use crate::types::{CycleMessage, CycleOutcome};

#[derive(Debug, Default)]
pub struct CycleTracker {
    in_cycle: bool,
    changes: usize,
}

impl CycleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the current cycle has seen any change so far.
    pub fn changes_seen(&self) -> bool {
        self.changes > 0
    }

    pub fn in_cycle(&self) -> bool {
        self.in_cycle
    }

    /// Feed one message. Returns `Some` exactly when `msg` is `End`.
    ///
    /// Message content is only logged; the decision depends on nothing but
    /// whether any `Change` arrived since the last `Start`.
    pub fn step(&mut self, msg: &CycleMessage) -> Option<CycleOutcome> {
        match msg {
            CycleMessage::Start => {
                debug!("{msg}");
                if self.in_cycle {
                    warn!("cycle started before the previous one ended; discarding it");
                }
                self.in_cycle = true;
                self.changes = 0;
                None
            }
            CycleMessage::Change(event) => {
                info!("{event}");
                if !self.in_cycle {
                    warn!(%event, "change received outside of a cycle");
                }
                self.changes += 1;
                None
            }
            CycleMessage::End => {
                debug!("{msg}");
                if !self.in_cycle {
                    warn!("cycle ended without a start; treating it as empty");
                    self.changes = 0;
                }
                let outcome = match self.changes {
                    0 => CycleOutcome::NoChanges,
                    count => CycleOutcome::ChangesFound { count },
                };
                self.in_cycle = false;
                self.changes = 0;
                Some(outcome)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChangeEvent;

    fn change(path: &str) -> CycleMessage {
        CycleMessage::Change(ChangeEvent::NewFile { path: path.into() })
    }

    #[test]
    fn empty_cycle_yields_no_changes() {
        let mut tracker = CycleTracker::new();
        assert_eq!(tracker.step(&CycleMessage::Start), None);
        assert_eq!(tracker.step(&CycleMessage::End), Some(CycleOutcome::NoChanges));
    }

    #[test]
    fn changes_between_sentinels_are_counted_once_per_cycle() {
        let mut tracker = CycleTracker::new();
        tracker.step(&CycleMessage::Start);
        assert_eq!(tracker.step(&change("a")), None);
        assert_eq!(tracker.step(&change("b")), None);
        assert!(tracker.changes_seen());
        assert_eq!(
            tracker.step(&CycleMessage::End),
            Some(CycleOutcome::ChangesFound { count: 2 })
        );

        // The flag resets for the next cycle.
        tracker.step(&CycleMessage::Start);
        assert!(!tracker.changes_seen());
        assert_eq!(tracker.step(&CycleMessage::End), Some(CycleOutcome::NoChanges));
    }

    #[test]
    fn stray_change_before_start_is_discarded_by_the_start() {
        let mut tracker = CycleTracker::new();
        tracker.step(&change("early"));
        tracker.step(&CycleMessage::Start);
        assert_eq!(tracker.step(&CycleMessage::End), Some(CycleOutcome::NoChanges));
    }

    #[test]
    fn end_without_start_is_an_empty_cycle() {
        let mut tracker = CycleTracker::new();
        tracker.step(&change("orphan"));
        assert_eq!(tracker.step(&CycleMessage::End), Some(CycleOutcome::NoChanges));
        assert!(!tracker.in_cycle());
    }
}
