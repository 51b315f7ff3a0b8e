//! Commands sent to the monitor actor.

use crate::core::TransitionHistory;
use crate::monitor::MonitorStatus;
use tokio::sync::oneshot;

/// Commands accepted by the monitor actor.
///
/// Every operation that touches the FSM travels through this enum, so the
/// actor task is the only place state ever changes.
#[derive(Debug)]
pub(crate) enum MonitorCommand {
    /// Edge from the application-protocol client.
    SetAppProtocolState {
        connected: bool,
        response_tx: oneshot::Sender<MonitorStatus>,
    },
    /// Run a poll evaluation immediately, outside the regular cadence.
    EvaluateNow {
        response_tx: oneshot::Sender<MonitorStatus>,
    },
    /// Read the current status.
    Status {
        response_tx: oneshot::Sender<MonitorStatus>,
    },
    /// Copy of the transition history.
    History {
        response_tx: oneshot::Sender<TransitionHistory>,
    },
    /// Stop the actor and drop the monitor.
    Shutdown { response_tx: oneshot::Sender<()> },
}
