//! Build errors for the monitor builder.

use thiserror::Error;

/// Errors that can occur when building a connection monitor.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Status source adapter not specified. Call .adapter(source) before .build()")]
    MissingAdapter,

    #[error("Status poll interval must be greater than zero")]
    ZeroPollInterval,

    #[error("Stability check interval must be greater than zero")]
    ZeroStabilityInterval,
}
