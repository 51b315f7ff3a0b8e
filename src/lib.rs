//! conn-monitor: debounced connection-status supervisor
//!
//! Observes a link-layer connection (e.g. WiFi) and an application-protocol
//! connection (e.g. a pub/sub client) and derives a stable connectivity
//! status through a four-state finite state machine driven by periodic
//! polling.
//!
//! # Core Concepts
//!
//! - **States**: [`ConnectionState`], from `Unconnected` to `AppProtocolConnected`
//! - **Transitions**: pure rules in [`core`], applied by the [`ConnectionMonitor`]
//! - **Debounce**: a raw link-up must survive a stability interval before it
//!   is reported as a stable link
//! - **Adapters**: [`StatusSource`] bridges the raw signals and receives
//!   status notifications
//! - **Runtime**: [`spawn_monitor`] runs a monitor on a tokio task
//!
//! # Example
//!
//! ```rust
//! use conn_monitor::adapter::{FlagStatusSource, StatusFlags};
//! use conn_monitor::builder::MonitorBuilder;
//! use conn_monitor::core::ConnectionState;
//!
//! let flags = StatusFlags::new();
//! let mut monitor = MonitorBuilder::new()
//!     .adapter(FlagStatusSource::new(flags.clone()))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(monitor.state(), ConnectionState::Unconnected);
//!
//! flags.set_link(true);
//! monitor.evaluate_state();
//! assert_eq!(monitor.state(), ConnectionState::LinkConnected);
//! assert!(!monitor.is_link_connected()); // not confirmed yet
//! ```

pub mod adapter;
pub mod builder;
pub mod config;
pub mod core;
pub mod monitor;
pub mod runtime;
pub mod timer;

// Re-export commonly used types
pub use adapter::{FlagStatusSource, NullStatusSource, StatusFlags, StatusSource};
pub use builder::{BuildError, MonitorBuilder};
pub use config::{ConfigError, MonitorConfig};
pub use self::core::{ConnectionState, TransitionHistory, TransitionRecord, Trigger};
pub use monitor::{ConnectionMonitor, MonitorStatus};
pub use runtime::{spawn_monitor, MonitorError, MonitorHandle};
