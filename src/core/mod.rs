//! Core FSM types and logic.
//!
//! This module contains the pure part of the connection monitor:
//! - State definitions via [`ConnectionState`]
//! - Transition rules and entry actions
//! - Bounded transition history
//!
//! Nothing here performs I/O or touches timers; the
//! [`ConnectionMonitor`](crate::monitor::ConnectionMonitor) applies the
//! decisions made here.

mod history;
mod state;
mod transition;

pub use history::{TransitionHistory, TransitionRecord, DEFAULT_HISTORY_CAPACITY};
pub use state::ConnectionState;
pub use transition::{entry_actions, evaluate, Action, Probe, Step, Trigger};
