//! Tunables of the connection monitor.

use crate::builder::BuildError;
use crate::core::DEFAULT_HISTORY_CAPACITY;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default status-poll interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Default stability-confirmation interval.
pub const DEFAULT_STABILITY_INTERVAL: Duration = Duration::from_millis(2000);

/// Errors that can occur when loading a [`MonitorConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse monitor config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid monitor config: {0}")]
    Invalid(#[from] BuildError),
}

/// Monitor configuration.
///
/// Intervals are (de)serialized as whole milliseconds; missing fields take
/// their defaults.
///
/// # Example
///
/// ```rust
/// use conn_monitor::config::MonitorConfig;
/// use std::time::Duration;
///
/// let config = MonitorConfig::from_json(r#"{ "stability_interval_ms": 5000 }"#).unwrap();
/// assert_eq!(config.poll_interval, Duration::from_millis(1000));
/// assert_eq!(config.stability_interval, Duration::from_millis(5000));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Cadence of the recurring status poll.
    #[serde(rename = "poll_interval_ms", with = "millis")]
    pub poll_interval: Duration,

    /// How long a raw link-up must persist before it is reported stable.
    #[serde(rename = "stability_interval_ms", with = "millis")]
    pub stability_interval: Duration,

    /// Number of transitions kept for diagnostics.
    pub history_capacity: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            stability_interval: DEFAULT_STABILITY_INTERVAL,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl MonitorConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject intervals the timers cannot run with.
    pub fn validate(&self) -> Result<(), BuildError> {
        if self.poll_interval.is_zero() {
            return Err(BuildError::ZeroPollInterval);
        }
        if self.stability_interval.is_zero() {
            return Err(BuildError::ZeroStabilityInterval);
        }
        Ok(())
    }
}

/// Whole milliseconds of `value`, saturating at `u64::MAX`.
pub(crate) fn as_millis_u64(value: Duration) -> u64 {
    u64::try_from(value.as_millis()).unwrap_or(u64::MAX)
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub(super) fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(super::as_millis_u64(*value))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
