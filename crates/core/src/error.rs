//! Error types for vanpack.

use thiserror::Error;

/// Result type alias for vanpack operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or running a pack.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid item provided.
    #[error("Invalid item: {0}")]
    InvalidItem(String),

    /// Invalid bin model provided.
    #[error("Invalid bin: {0}")]
    InvalidBin(String),

    /// Pack configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A strategy literal did not match any known packing strategy.
    #[error("Unknown packing strategy: {0}")]
    UnknownStrategy(String),

    /// A constraint key did not match any registered constraint.
    #[error("Unknown constraint: {0}")]
    UnknownConstraint(String),
}
