//! Error types for the telemetry gateway.

use thiserror::Error;

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors that can occur talking to the telemetry platform.
///
/// The display string of every variant is what ends up in the ledger's
/// `error_message` field, so each carries enough context to diagnose a
/// failed sync from the ledger alone.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Network-level failure (DNS, connect, TLS, reset).
    #[error("transport error: {0}")]
    Transport(String),

    /// The request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The platform answered with a non-success status.
    #[error("upstream returned {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated for storage.
        body: String,
    },

    /// The request body could not be encoded.
    #[error("failed to encode payload: {0}")]
    InvalidPayload(String),
}

impl GatewayError {
    /// Returns true if the failure was a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, GatewayError::Timeout)
    }
}
