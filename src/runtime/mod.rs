//! Tokio runtime for a connection monitor.
//!
//! The monitor itself is single-threaded and expects its callbacks to be
//! serialized. [`spawn_monitor`] moves it onto one actor task that sleeps
//! until the next timer deadline, services expired timers, and handles
//! commands from any number of [`MonitorHandle`] clones in between. Status
//! changes are published on a `watch` channel.

mod command;
mod error;
mod handle;

pub use error::MonitorError;
pub use handle::MonitorHandle;

use crate::adapter::StatusSource;
use crate::config::as_millis_u64;
use crate::monitor::{ConnectionMonitor, MonitorStatus};
use command::MonitorCommand;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, info};

const COMMAND_CHANNEL_CAPACITY: usize = 32;

/// Run `monitor` on a new tokio task and return a handle to it.
///
/// The actor stops on [`MonitorHandle::shutdown`] or once every handle has
/// been dropped. Must be called from within a tokio runtime.
pub fn spawn_monitor<A>(monitor: ConnectionMonitor<A>) -> MonitorHandle
where
    A: StatusSource + Send + 'static,
{
    let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
    let (status_tx, status_rx) = watch::channel(monitor.status());

    info!(
        poll_interval_ms = as_millis_u64(monitor.poll_interval()),
        stability_interval_ms = as_millis_u64(monitor.stability_interval()),
        "starting connection monitor"
    );

    let actor = MonitorActor {
        monitor,
        command_rx,
        status_tx,
    };
    tokio::spawn(actor.run());

    MonitorHandle::new(command_tx, status_rx)
}

/// Owns the monitor for the lifetime of the task.
struct MonitorActor<A: StatusSource> {
    monitor: ConnectionMonitor<A>,
    command_rx: mpsc::Receiver<MonitorCommand>,
    status_tx: watch::Sender<MonitorStatus>,
}

impl<A: StatusSource> MonitorActor<A> {
    async fn run(mut self) {
        let shutdown_ack = loop {
            let deadline = self.monitor.next_deadline();

            tokio::select! {
                biased;
                command = self.command_rx.recv() => match command {
                    Some(MonitorCommand::Shutdown { response_tx }) => break Some(response_tx),
                    Some(command) => self.handle_command(command),
                    None => break None,
                },
                _ = wait_until(deadline) => {
                    self.monitor.tick(Instant::now());
                }
            }

            self.publish();
        };

        // Adapter and timers go away with the monitor before the ack.
        drop(self);
        debug!("connection monitor stopped");

        if let Some(response_tx) = shutdown_ack {
            let _ = response_tx.send(());
        }
    }

    fn handle_command(&mut self, command: MonitorCommand) {
        match command {
            MonitorCommand::SetAppProtocolState {
                connected,
                response_tx,
            } => {
                self.monitor.set_app_protocol_state(connected);
                let _ = response_tx.send(self.monitor.status());
            }
            MonitorCommand::EvaluateNow { response_tx } => {
                self.monitor.evaluate_state();
                let _ = response_tx.send(self.monitor.status());
            }
            MonitorCommand::Status { response_tx } => {
                let _ = response_tx.send(self.monitor.status());
            }
            MonitorCommand::History { response_tx } => {
                let _ = response_tx.send(self.monitor.history().clone());
            }
            MonitorCommand::Shutdown { response_tx } => {
                // Handled by the run loop; acknowledge anyway if it gets here.
                let _ = response_tx.send(());
            }
        }
    }

    fn publish(&self) {
        let status = self.monitor.status();
        self.status_tx.send_if_modified(|current| {
            if *current == status {
                false
            } else {
                *current = status;
                true
            }
        });
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{FlagStatusSource, StatusFlags};
    use crate::config::MonitorConfig;
    use crate::core::ConnectionState;
    use std::time::Duration;

    fn flag_monitor(flags: &StatusFlags) -> ConnectionMonitor<FlagStatusSource> {
        ConnectionMonitor::new(FlagStatusSource::new(flags.clone()), &MonitorConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn evaluate_now_bypasses_cadence() {
        let flags = StatusFlags::new();
        flags.set_link(true);
        let handle = spawn_monitor(flag_monitor(&flags));

        let status = handle.evaluate_now().await.unwrap();
        assert_eq!(status.state, ConnectionState::LinkConnected);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_closes_handle() {
        let handle = spawn_monitor(flag_monitor(&StatusFlags::new()));
        let other = handle.clone();

        handle.shutdown().await.unwrap();

        assert_eq!(other.status().await, Err(MonitorError::Closed));
        assert_eq!(
            other.set_app_protocol_state(true).await,
            Err(MonitorError::Closed)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn latest_tracks_published_status() {
        let flags = StatusFlags::new();
        let handle = spawn_monitor(flag_monitor(&flags));
        assert_eq!(handle.latest().state, ConnectionState::Unconnected);

        flags.set_link(true);
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(handle.latest().state, ConnectionState::LinkConnected);
        assert_eq!(handle.latest().previous_state, ConnectionState::Unconnected);
    }
}
