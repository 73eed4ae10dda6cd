//! # CardioTrack Store
//!
//! Persistence seam for the CardioTrack sync pipeline.
//!
//! This crate provides:
//! - [`MeasurementStore`] - the narrow trait the sync engine consumes
//! - [`MemoryStore`] - a thread-safe in-memory implementation
//! - [`SyncCounts`] - aggregate counters for the status endpoint
//!
//! The trait deliberately exposes explicit read-modify-write operations
//! (`find`, `save`) rather than live records, so the engine stays
//! independent of the storage technology. A relational store, an embedded
//! key-value store, or [`MemoryStore`] can all sit behind it.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod memory;
mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use store::{MeasurementRecord, MeasurementStore, SyncCounts};
