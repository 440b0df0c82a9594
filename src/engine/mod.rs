// src/engine/mod.rs

//! Reaction engine for dirpoll.
//!
//! Turns the monitor's raw `Start` / `Change` / `End` stream into one
//! decision per polling cycle and invokes the configured action.
//!
//! The pure per-cycle state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

pub mod core;
pub mod runtime;

pub use core::CycleTracker;
pub use runtime::ChangeReactor;
