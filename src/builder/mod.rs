//! Builder API for constructing connection monitors.
//!
//! The builder validates the configuration and refuses to build a monitor
//! without an adapter. Use [`ConnectionMonitor::default`] when a monitor
//! without a real driver is wanted.
//!
//! [`ConnectionMonitor::default`]: crate::monitor::ConnectionMonitor

pub mod error;
pub mod monitor;

pub use error::BuildError;
pub use monitor::MonitorBuilder;
