//! Error types for the herald-core crate.

use thiserror::Error;

/// Errors that can occur while building the core's configuration.
///
/// Classification and formatting are total, so configuration is the only
/// place the core can fail.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Invalid filter configuration.
    #[error("invalid filter config: {reason}")]
    InvalidConfig {
        /// The reason the configuration is invalid.
        reason: String,
    },
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
