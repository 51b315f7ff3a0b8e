//! Client handle of a running monitor.

use super::command::MonitorCommand;
use super::error::MonitorError;
use crate::core::TransitionHistory;
use crate::monitor::MonitorStatus;
use tokio::sync::{mpsc, oneshot, watch};

/// Handle to a monitor running on its own task.
///
/// Cheap to clone; all clones talk to the same actor. Once the actor has
/// shut down every request fails with [`MonitorError::Closed`].
#[derive(Clone, Debug)]
pub struct MonitorHandle {
    command_tx: mpsc::Sender<MonitorCommand>,
    status_rx: watch::Receiver<MonitorStatus>,
}

impl MonitorHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<MonitorCommand>,
        status_rx: watch::Receiver<MonitorStatus>,
    ) -> Self {
        Self {
            command_tx,
            status_rx,
        }
    }

    /// Report an application-protocol connectivity edge.
    ///
    /// Returns the status after the edge was applied.
    pub async fn set_app_protocol_state(&self, connected: bool) -> Result<MonitorStatus, MonitorError> {
        self.request(|response_tx| MonitorCommand::SetAppProtocolState {
            connected,
            response_tx,
        })
        .await
    }

    /// Evaluate the raw signals now instead of waiting for the next poll.
    pub async fn evaluate_now(&self) -> Result<MonitorStatus, MonitorError> {
        self.request(|response_tx| MonitorCommand::EvaluateNow { response_tx })
            .await
    }

    /// Current status, read from the actor.
    pub async fn status(&self) -> Result<MonitorStatus, MonitorError> {
        self.request(|response_tx| MonitorCommand::Status { response_tx })
            .await
    }

    /// Copy of the monitor's transition history.
    pub async fn history(&self) -> Result<TransitionHistory, MonitorError> {
        self.request(|response_tx| MonitorCommand::History { response_tx })
            .await
    }

    /// Last published status, without a round trip to the actor.
    pub fn latest(&self) -> MonitorStatus {
        *self.status_rx.borrow()
    }

    /// Receiver notified on every status change.
    pub fn subscribe(&self) -> watch::Receiver<MonitorStatus> {
        self.status_rx.clone()
    }

    /// Stop the actor. The monitor, its adapter and timers are dropped.
    pub async fn shutdown(&self) -> Result<(), MonitorError> {
        self.request(|response_tx| MonitorCommand::Shutdown { response_tx })
            .await
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> MonitorCommand,
    ) -> Result<T, MonitorError> {
        let (response_tx, response_rx) = oneshot::channel();

        self.command_tx
            .send(command(response_tx))
            .await
            .map_err(|_| MonitorError::Closed)?;

        response_rx.await.map_err(|_| MonitorError::Closed)
    }
}
