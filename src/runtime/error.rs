//! Errors reported by the monitor handle.

use thiserror::Error;

/// Errors that can occur when talking to a running monitor.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MonitorError {
    /// The actor task has stopped; the monitor is gone.
    #[error("Connection monitor task has shut down")]
    Closed,
}
