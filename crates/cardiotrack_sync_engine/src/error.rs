//! Error types for the sync engine.

use cardiotrack_gateway::GatewayError;
use cardiotrack_model::MeasurementId;
use cardiotrack_store::StoreError;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during sync operations.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The referenced measurement does not exist (forced-sync path).
    #[error("measurement {0} not found")]
    NotFound(MeasurementId),

    /// The telemetry gateway call failed.
    ///
    /// The message is the raw upstream error, as stored in the ledger's
    /// `error_message` field.
    #[error("upstream sync failed: {message}")]
    Upstream {
        /// Raw gateway error message.
        message: String,
    },

    /// The store itself failed; there is no per-item recovery for this.
    #[error("infrastructure error: {0}")]
    Infrastructure(#[from] StoreError),
}

impl SyncError {
    /// Returns true if this is a missing-measurement error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SyncError::NotFound(_))
    }

    /// Returns true if this is an upstream (gateway) failure.
    pub fn is_upstream(&self) -> bool {
        matches!(self, SyncError::Upstream { .. })
    }
}

impl From<GatewayError> for SyncError {
    fn from(error: GatewayError) -> Self {
        SyncError::Upstream {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_errors_become_upstream() {
        let err: SyncError = GatewayError::Timeout.into();
        assert!(err.is_upstream());
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn store_errors_become_infrastructure() {
        let err: SyncError = StoreError::Unavailable("down".into()).into();
        assert!(!err.is_upstream());
        assert!(err.to_string().contains("down"));
    }

    #[test]
    fn not_found_names_the_measurement() {
        let id = MeasurementId::new();
        let err = SyncError::NotFound(id);
        assert!(err.is_not_found());
        assert!(err.to_string().contains(&id.to_string()));
    }
}
