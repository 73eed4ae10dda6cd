//! # CardioTrack Model
//!
//! Shared domain types for the CardioTrack measurement sync pipeline.
//!
//! This crate provides:
//! - [`Measurement`] - one heart-rate sample tied to a patient
//! - [`SyncStatus`] - the per-measurement reconciliation ledger entry
//! - [`SyncState`] - the ledger state machine (pending → synced/failed)
//! - Validation for device uploads ([`NewMeasurement`])
//!
//! ## Key Invariants
//!
//! - Every measurement has exactly one ledger entry, created with it
//! - `retry_count` never decreases, and is never reset on success
//! - The sync engine is the only writer to ledger state after creation

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod ledger;
mod measurement;

pub use error::{ModelError, ModelResult};
pub use ledger::{SyncState, SyncStatus, SyncStatusId};
pub use measurement::{Measurement, MeasurementId, NewMeasurement, PatientId, BPM_MAX, BPM_MIN};
