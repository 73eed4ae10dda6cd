//! Error types for the server surface.

use cardiotrack_model::{MeasurementId, ModelError};
use cardiotrack_sync_engine::SyncError;
use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors surfaced to API callers.
#[derive(Error, Debug)]
pub enum ServerError {
    /// The referenced measurement does not exist.
    #[error("measurement {0} not found")]
    NotFound(MeasurementId),

    /// The uploaded measurement failed validation.
    #[error("invalid upload: {0}")]
    InvalidUpload(#[from] ModelError),

    /// The telemetry platform rejected or never received the request.
    #[error("upstream sync failed: {0}")]
    Upstream(String),

    /// The store or another internal component failed.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Returns true if this is a client error (4xx).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ServerError::NotFound(_) | ServerError::InvalidUpload(_)
        )
    }

    /// Returns true if this is a server error (5xx).
    pub fn is_server_error(&self) -> bool {
        matches!(self, ServerError::Upstream(_) | ServerError::Internal(_))
    }
}

impl From<SyncError> for ServerError {
    fn from(error: SyncError) -> Self {
        match error {
            SyncError::NotFound(id) => ServerError::NotFound(id),
            SyncError::Upstream { message } => ServerError::Upstream(message),
            SyncError::Infrastructure(e) => ServerError::Internal(e.to_string()),
        }
    }
}
