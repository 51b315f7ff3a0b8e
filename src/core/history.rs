//! Transition history for diagnostics.
//!
//! Keeps the most recent transitions in a bounded buffer so a long-running
//! monitor never grows without limit.

use super::state::ConnectionState;
use super::transition::Trigger;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Default number of transitions retained.
pub const DEFAULT_HISTORY_CAPACITY: usize = 32;

/// Record of a single state transition.
///
/// # Example
///
/// ```rust
/// use conn_monitor::core::{ConnectionState, TransitionRecord, Trigger};
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     from: ConnectionState::Unconnected,
///     to: ConnectionState::LinkConnected,
///     cause: Some(Trigger::PollTick),
///     timestamp: Utc::now(),
/// };
/// assert_eq!(record.to, ConnectionState::LinkConnected);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// The state being transitioned from
    pub from: ConnectionState,
    /// The state being transitioned to
    pub to: ConnectionState,
    /// What caused the transition; `None` for a direct `change_state` call
    pub cause: Option<Trigger>,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

/// Ordered, bounded history of state transitions.
///
/// When full, recording a transition drops the oldest one.
///
/// # Example
///
/// ```rust
/// use conn_monitor::core::{ConnectionState, TransitionHistory, TransitionRecord, Trigger};
/// use chrono::Utc;
///
/// let mut history = TransitionHistory::with_capacity(8);
/// history.record(TransitionRecord {
///     from: ConnectionState::Unconnected,
///     to: ConnectionState::LinkConnected,
///     cause: Some(Trigger::PollTick),
///     timestamp: Utc::now(),
/// });
/// history.record(TransitionRecord {
///     from: ConnectionState::LinkConnected,
///     to: ConnectionState::StableLinkConnection,
///     cause: Some(Trigger::StabilityTimerExpired),
///     timestamp: Utc::now(),
/// });
///
/// let path = history.path();
/// assert_eq!(path.len(), 3); // Unconnected -> LinkConnected -> StableLinkConnection
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "HistoryFields")]
pub struct TransitionHistory {
    transitions: VecDeque<TransitionRecord>,
    capacity: usize,
}

/// Serialized form; trimmed to its capacity on the way in.
#[derive(Deserialize)]
struct HistoryFields {
    transitions: VecDeque<TransitionRecord>,
    capacity: usize,
}

impl From<HistoryFields> for TransitionHistory {
    fn from(fields: HistoryFields) -> Self {
        let HistoryFields {
            mut transitions,
            capacity,
        } = fields;
        let excess = transitions.len().saturating_sub(capacity);
        transitions.drain(..excess);
        Self {
            transitions,
            capacity,
        }
    }
}

impl Default for TransitionHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl TransitionHistory {
    /// Create an empty history retaining at most `capacity` transitions.
    ///
    /// A capacity of zero disables recording.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            transitions: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Maximum number of retained transitions.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record a transition, evicting the oldest when full.
    pub fn record(&mut self, transition: TransitionRecord) {
        if self.capacity == 0 {
            return;
        }
        while self.transitions.len() >= self.capacity {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// Get the path of states traversed.
    ///
    /// Returns the `from` state of the oldest retained transition, then
    /// the `to` state of each transition.
    pub fn path(&self) -> Vec<ConnectionState> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(first.from);
        }
        path.extend(self.transitions.iter().map(|t| t.to));
        path
    }

    /// Time between the oldest and newest retained transition.
    ///
    /// Measured on the wall clock of the record timestamps, not on the timer
    /// clock, so it reads as zero under a paused tokio clock.
    ///
    /// Returns `None` if there are no transitions.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.front()?, self.transitions.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// Most recent transition, if any.
    pub fn last(&self) -> Option<&TransitionRecord> {
        self.transitions.back()
    }

    /// All retained transitions, oldest first.
    pub fn transitions(&self) -> impl ExactSizeIterator<Item = &TransitionRecord> {
        self.transitions.iter()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
