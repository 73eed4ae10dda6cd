//! # CardioTrack Sync Engine
//!
//! The reconciliation engine that forwards locally stored heart-rate
//! measurements to the external telemetry platform.
//!
//! This crate provides:
//! - Batch reconciliation pass over eligible measurements
//! - Single-item sync (the unit of retry)
//! - Forced, ceiling-bypassing sync for administrative recovery
//! - Aggregate status reporting
//!
//! ## Architecture
//!
//! The engine sits between two seams: a [`MeasurementStore`] it selects
//! from and writes ledger updates to, and a [`TelemetryGateway`] it
//! pushes variable updates through. It holds no timer state; scheduling
//! is an external driver (see `cardiotrack_server::SyncScheduler`) that
//! re-invokes the batch pass.
//!
//! ## Key Invariants
//!
//! - A ledger entry in `synced` state is never selected by the batch pass
//! - Once `retry_count` reaches the ceiling, only a forced sync attempts it
//! - `retry_count` never decreases, and success never resets it
//! - One failing item never aborts a batch pass
//! - Each `sync_one` call performs exactly one gateway attempt; retries
//!   happen only through re-invocation of the batch pass
//!
//! [`MeasurementStore`]: cardiotrack_store::MeasurementStore
//! [`TelemetryGateway`]: cardiotrack_gateway::TelemetryGateway

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod engine;
mod error;

pub use config::{SyncConfig, VariableNames};
pub use engine::{BatchOutcome, SyncEngine, SyncSummary};
pub use error::{SyncError, SyncResult};
