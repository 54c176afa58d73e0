//! Error types and retry classification for the providers crate.
//!
//! This module provides:
//! - [`SportsDataError`]: The error enum for all adapter and registry operations
//! - [`RetryClass`]: Classification for determining fallback behavior

mod retry;

pub use retry::RetryClass;

use thiserror::Error;

/// Errors that can occur while fetching sports data from a provider.
///
/// Each variant is classified into a [`RetryClass`] via the
/// [`retry_class`](Self::retry_class) method, which determines how the
/// aggregator treats the failure.
#[derive(Error, Debug)]
pub enum SportsDataError {
    /// The caller passed a malformed request (empty league id, bad sport code).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The provider does not implement the requested capability.
    #[error("{operation} not supported by {provider}")]
    NotSupported {
        operation: String,
        provider: String,
    },

    /// The provider answered successfully but returned no items, and gave no
    /// indication whether that is expected.
    #[error("Empty response from {provider}")]
    EmptyResponse { provider: String },

    /// The provider explicitly confirmed there is no data for the request.
    #[error("No data from {provider}: {reason}")]
    ConfirmedEmpty { provider: String, reason: String },

    /// The provider rate limited the request (HTTP 429 or quota exhausted).
    #[error("Rate limited: {provider}")]
    RateLimited { provider: String },

    /// The request to the provider exceeded its time budget.
    #[error("Timeout: {provider}")]
    Timeout { provider: String },

    /// A provider-specific error occurred.
    #[error("Provider error: {provider} - {message}")]
    ProviderError { provider: String, message: String },

    /// Every item returned by the provider failed the minimal-shape check.
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl SportsDataError {
    /// Returns the fallback classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use sportsfeed_providers::errors::{RetryClass, SportsDataError};
    ///
    /// let error = SportsDataError::Timeout { provider: "API_FOOTBALL".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::FailoverWithPenalty);
    ///
    /// let error = SportsDataError::InvalidRequest("empty league".to_string());
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::InvalidRequest(_) => RetryClass::Never,

            Self::RateLimited { .. } | Self::Timeout { .. } | Self::Network(_) => {
                RetryClass::FailoverWithPenalty
            }

            Self::NotSupported { .. }
            | Self::EmptyResponse { .. }
            | Self::ProviderError { .. }
            | Self::ValidationFailed { .. } => RetryClass::NextProvider,

            Self::ConfirmedEmpty { .. } => RetryClass::ConfirmedEmpty,
        }
    }

    /// Classify a failed HTTP send. Timeouts keep the provider name; anything
    /// else (refused connection, DNS, TLS) is a [`Self::Network`] error.
    pub fn from_send(provider: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                provider: provider.to_string(),
            }
        } else {
            Self::Network(error)
        }
    }

    /// Shorthand used by adapters when a capability is not implemented.
    pub fn not_supported(operation: &str, provider: &str) -> Self {
        Self::NotSupported {
            operation: operation.to_string(),
            provider: provider.to_string(),
        }
    }
}
