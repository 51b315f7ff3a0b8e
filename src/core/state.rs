//! Connection states of the monitor FSM.
//!
//! States carry no data of their own. Behavior for each state lives in
//! [`transition`](super::transition) as free functions selected by a single
//! `match`, so the enum itself stays a plain `Copy` value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four connectivity states. Exactly one is active at any time.
///
/// The states are ordered from "nothing" to "fullest" connectivity, but no
/// state is terminal: the machine cycles as physical connectivity changes.
///
/// # Example
///
/// ```rust
/// use conn_monitor::core::ConnectionState;
///
/// let state = ConnectionState::default();
/// assert_eq!(state, ConnectionState::Unconnected);
/// assert_eq!(state.name(), "Unconnected");
/// assert!(!state.is_link_stable());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionState {
    /// No usable link. Initial state.
    #[default]
    Unconnected,
    /// Raw link is up, waiting for the stability timer to confirm it.
    LinkConnected,
    /// Link stayed up for a full stability interval.
    StableLinkConnection,
    /// Stable link and the application protocol is connected.
    AppProtocolConnected,
}

impl ConnectionState {
    /// All states, in declaration order.
    pub const ALL: [ConnectionState; 4] = [
        ConnectionState::Unconnected,
        ConnectionState::LinkConnected,
        ConnectionState::StableLinkConnection,
        ConnectionState::AppProtocolConnected,
    ];

    /// Get the state's name for display/logging.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Unconnected => "Unconnected",
            Self::LinkConnected => "LinkConnected",
            Self::StableLinkConnection => "StableLinkConnection",
            Self::AppProtocolConnected => "AppProtocolConnected",
        }
    }

    /// True only in [`StableLinkConnection`](Self::StableLinkConnection).
    ///
    /// `AppProtocolConnected` implies a stable link physically, but the
    /// externally reported link status is tied to state identity.
    pub const fn is_link_stable(&self) -> bool {
        matches!(self, Self::StableLinkConnection)
    }

    /// True only in [`AppProtocolConnected`](Self::AppProtocolConnected).
    pub const fn is_app_protocol_connected(&self) -> bool {
        matches!(self, Self::AppProtocolConnected)
    }

    /// Whether the stability timer has meaning in this state.
    pub const fn awaits_stability(&self) -> bool {
        matches!(self, Self::LinkConnected)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
