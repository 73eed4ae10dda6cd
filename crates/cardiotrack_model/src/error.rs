//! Error types for domain validation.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors produced while validating domain objects.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Heart-rate value outside the physiologically valid range.
    #[error("bpm {value} out of range ({min}..={max})")]
    BpmOutOfRange {
        /// The rejected value.
        value: u16,
        /// Lower bound (inclusive).
        min: u16,
        /// Upper bound (inclusive).
        max: u16,
    },

    /// Measurement timestamp lies in the future.
    #[error("measurement timestamp {timestamp} is in the future")]
    FutureTimestamp {
        /// The rejected timestamp (RFC 3339).
        timestamp: String,
    },

    /// Signal series was present but empty.
    #[error("signal series must not be empty when present")]
    EmptySignalSeries,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ModelError::BpmOutOfRange {
            value: 250,
            min: 30,
            max: 220,
        };
        let msg = err.to_string();
        assert!(msg.contains("250"));
        assert!(msg.contains("30"));
        assert!(msg.contains("220"));
    }
}
