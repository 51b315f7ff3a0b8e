//! Builder for constructing connection monitors.

use crate::adapter::{NullStatusSource, StatusSource};
use crate::builder::error::BuildError;
use crate::config::MonitorConfig;
use crate::monitor::ConnectionMonitor;
use std::time::Duration;

/// Builder for constructing a [`ConnectionMonitor`] with a fluent API.
///
/// # Example
///
/// ```rust
/// use conn_monitor::adapter::{FlagStatusSource, StatusFlags};
/// use conn_monitor::builder::MonitorBuilder;
/// use std::time::Duration;
///
/// let monitor = MonitorBuilder::new()
///     .adapter(FlagStatusSource::new(StatusFlags::new()))
///     .stability_interval(Duration::from_secs(5))
///     .build()
///     .unwrap();
///
/// assert!(!monitor.is_link_connected());
/// ```
pub struct MonitorBuilder<A: StatusSource = NullStatusSource> {
    adapter: Option<A>,
    config: MonitorConfig,
}

impl<A: StatusSource> MonitorBuilder<A> {
    /// Create a new builder with default tunables.
    pub fn new() -> Self {
        Self {
            adapter: None,
            config: MonitorConfig::default(),
        }
    }

    /// Set the status source adapter (required).
    pub fn adapter(mut self, adapter: A) -> Self {
        self.adapter = Some(adapter);
        self
    }

    /// Replace all tunables at once.
    pub fn config(mut self, config: MonitorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    pub fn stability_interval(mut self, interval: Duration) -> Self {
        self.config.stability_interval = interval;
        self
    }

    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.config.history_capacity = capacity;
        self
    }

    /// Build the monitor.
    /// Returns an error if the adapter is missing or an interval is zero.
    pub fn build(self) -> Result<ConnectionMonitor<A>, BuildError> {
        let adapter = self.adapter.ok_or(BuildError::MissingAdapter)?;
        self.config.validate()?;
        Ok(ConnectionMonitor::new(adapter, &self.config))
    }
}

impl<A: StatusSource> Default for MonitorBuilder<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{FlagStatusSource, StatusFlags};
    use crate::core::ConnectionState;

    #[test]
    fn builder_requires_adapter() {
        let result = MonitorBuilder::<NullStatusSource>::new().build();
        assert!(matches!(result, Err(BuildError::MissingAdapter)));
    }

    #[test]
    fn builder_rejects_zero_intervals() {
        let result = MonitorBuilder::new()
            .adapter(NullStatusSource)
            .poll_interval(Duration::ZERO)
            .build();
        assert!(matches!(result, Err(BuildError::ZeroPollInterval)));

        let result = MonitorBuilder::new()
            .adapter(NullStatusSource)
            .stability_interval(Duration::ZERO)
            .build();
        assert!(matches!(result, Err(BuildError::ZeroStabilityInterval)));
    }

    #[test]
    fn fluent_api_builds_monitor() {
        let monitor = MonitorBuilder::new()
            .adapter(FlagStatusSource::new(StatusFlags::new()))
            .poll_interval(Duration::from_millis(250))
            .stability_interval(Duration::from_millis(500))
            .history_capacity(4)
            .build()
            .unwrap();

        assert_eq!(monitor.state(), ConnectionState::Unconnected);
        assert_eq!(monitor.previous_state(), ConnectionState::Unconnected);
        assert_eq!(monitor.poll_interval(), Duration::from_millis(250));
        assert_eq!(monitor.stability_interval(), Duration::from_millis(500));
        assert_eq!(monitor.history().capacity(), 4);
    }

    #[test]
    fn config_replaces_tunables() {
        let config = MonitorConfig {
            poll_interval: Duration::from_millis(100),
            ..MonitorConfig::default()
        };
        let monitor = MonitorBuilder::new()
            .adapter(NullStatusSource)
            .config(config)
            .build()
            .unwrap();
        assert_eq!(monitor.poll_interval(), Duration::from_millis(100));
    }
}
