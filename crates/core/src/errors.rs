//! Core error types.

use sportsfeed_providers::SportsDataError;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the engine.
///
/// Provider failures never reach callers through this type; the aggregator
/// absorbs them. What does surface is malformed input and lookups of things
/// that do not exist.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Sports data operation failed: {0}")]
    SportsData(#[from] SportsDataError),

    #[error("Input validation failed: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// True when the caller sent something malformed.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_) | Self::SportsData(SportsDataError::InvalidRequest(_))
        )
    }
}
