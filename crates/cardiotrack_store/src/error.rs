//! Error types for the measurement store.

use cardiotrack_model::MeasurementId;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in a measurement store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A ledger entry already exists for the measurement.
    ///
    /// The measurement/ledger pairing is strictly 1:1; a second entry is a
    /// bug in the caller.
    #[error("duplicate ledger entry for measurement {0}")]
    DuplicateLedgerEntry(MeasurementId),

    /// The referenced measurement does not exist.
    #[error("unknown measurement {0}")]
    UnknownMeasurement(MeasurementId),

    /// The backing store is unavailable or failed mid-operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// I/O error from a durable backend.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
