//! Transition rules of the connection FSM.
//!
//! Every rule is a pure function of the active state, the trigger and the raw
//! signals read through a [`Probe`]. The monitor applies the returned
//! [`Step`]; nothing in this module mutates anything.
//!
//! | State | Entry | poll tick | stability expiry | app-protocol edge |
//! |---|---|---|---|---|
//! | Unconnected | notify link=false, app=false | link → LinkConnected | - | - |
//! | LinkConnected | start stability timer | !link → Unconnected | link → Stable, else → Unconnected | - |
//! | StableLinkConnection | notify link=true | !link → Unconnected; app → AppProtocolConnected | - | true → AppProtocolConnected |
//! | AppProtocolConnected | notify app=true | !link → Unconnected; !app → Stable (+ app=false) | - | false → LinkConnected |

use super::state::ConnectionState;
use serde::{Deserialize, Serialize};

/// Source of raw connectivity signals consulted by the transition rules.
///
/// Rules query lazily: a state that only cares about the link never asks
/// for the application-protocol signal.
pub trait Probe {
    /// Raw link-layer connectivity.
    fn link_connected(&self) -> bool;

    /// Raw application-protocol connectivity.
    fn app_protocol_connected(&self) -> bool;
}

/// What caused an evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger {
    /// Recurring status-poll timer expired.
    PollTick,
    /// One-shot stability-confirmation timer expired.
    StabilityTimerExpired,
    /// Application-protocol layer reported a connectivity edge.
    AppProtocolEvent { connected: bool },
}

/// Side effect the monitor performs on behalf of a state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Report link connectivity to the adapter.
    NotifyLinkConnected(bool),
    /// Report application-protocol connectivity to the adapter.
    NotifyAppProtocolConnected(bool),
    /// Arm the one-shot stability timer.
    StartStabilityTimer,
}

/// A transition decided by the rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    /// State to change to.
    pub to: ConnectionState,
    /// Action to run after the new state's entry action.
    pub then: Option<Action>,
}

impl Step {
    const fn to(state: ConnectionState) -> Self {
        Self {
            to: state,
            then: None,
        }
    }

    const fn then(self, action: Action) -> Self {
        Self {
            to: self.to,
            then: Some(action),
        }
    }
}

/// Entry actions of a state, run in order by `change_state`.
pub fn entry_actions(state: ConnectionState) -> &'static [Action] {
    match state {
        ConnectionState::Unconnected => &[
            Action::NotifyLinkConnected(false),
            Action::NotifyAppProtocolConnected(false),
        ],
        ConnectionState::LinkConnected => &[Action::StartStabilityTimer],
        ConnectionState::StableLinkConnection => &[Action::NotifyLinkConnected(true)],
        ConnectionState::AppProtocolConnected => &[Action::NotifyAppProtocolConnected(true)],
    }
}

/// Decide the transition for `trigger` in `state`.
///
/// Returns `None` when the state stays put, including triggers the state
/// does not handle (app-protocol edges outside the two app-aware states, and
/// stability expiries outside `LinkConnected`).
pub fn evaluate<P>(state: ConnectionState, trigger: Trigger, probe: &P) -> Option<Step>
where
    P: Probe + ?Sized,
{
    use ConnectionState::*;

    match (state, trigger) {
        (Unconnected, Trigger::PollTick) => unconnected::on_poll(probe),
        (LinkConnected, Trigger::PollTick) => link_connected::on_poll(probe),
        (LinkConnected, Trigger::StabilityTimerExpired) => link_connected::on_stable_check(probe),
        (StableLinkConnection, Trigger::PollTick) => stable_link::on_poll(probe),
        (StableLinkConnection, Trigger::AppProtocolEvent { connected }) => {
            stable_link::on_app_protocol(connected)
        }
        (AppProtocolConnected, Trigger::PollTick) => app_protocol::on_poll(probe),
        (AppProtocolConnected, Trigger::AppProtocolEvent { connected }) => {
            app_protocol::on_app_protocol(connected)
        }
        _ => None,
    }
}

mod unconnected {
    use super::*;

    pub(super) fn on_poll<P: Probe + ?Sized>(probe: &P) -> Option<Step> {
        probe
            .link_connected()
            .then_some(Step::to(ConnectionState::LinkConnected))
    }
}

mod link_connected {
    use super::*;

    pub(super) fn on_poll<P: Probe + ?Sized>(probe: &P) -> Option<Step> {
        (!probe.link_connected()).then_some(Step::to(ConnectionState::Unconnected))
    }

    pub(super) fn on_stable_check<P: Probe + ?Sized>(probe: &P) -> Option<Step> {
        if probe.link_connected() {
            Some(Step::to(ConnectionState::StableLinkConnection))
        } else {
            Some(Step::to(ConnectionState::Unconnected))
        }
    }
}

mod stable_link {
    use super::*;

    pub(super) fn on_poll<P: Probe + ?Sized>(probe: &P) -> Option<Step> {
        if !probe.link_connected() {
            Some(Step::to(ConnectionState::Unconnected))
        } else if probe.app_protocol_connected() {
            Some(Step::to(ConnectionState::AppProtocolConnected))
        } else {
            None
        }
    }

    pub(super) fn on_app_protocol(connected: bool) -> Option<Step> {
        connected.then_some(Step::to(ConnectionState::AppProtocolConnected))
    }
}

mod app_protocol {
    use super::*;

    pub(super) fn on_poll<P: Probe + ?Sized>(probe: &P) -> Option<Step> {
        if !probe.link_connected() {
            Some(Step::to(ConnectionState::Unconnected))
        } else if !probe.app_protocol_connected() {
            Some(
                Step::to(ConnectionState::StableLinkConnection)
                    .then(Action::NotifyAppProtocolConnected(false)),
            )
        } else {
            None
        }
    }

    // Losing the app protocol re-arms the stability check.
    pub(super) fn on_app_protocol(connected: bool) -> Option<Step> {
        (!connected).then_some(Step::to(ConnectionState::LinkConnected))
    }
}
