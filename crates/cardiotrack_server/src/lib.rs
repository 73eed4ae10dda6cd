//! # CardioTrack Server
//!
//! The API-facing surface of the sync pipeline and its periodic driver.
//!
//! This crate provides:
//! - [`SyncApi`] - framework-free handlers for the sync endpoints
//!   (trigger, status, force, ingest)
//! - [`ServerError`] - error classification for response mapping
//! - [`SyncScheduler`] - tokio task re-invoking the batch pass on an
//!   interval
//!
//! # Architecture
//!
//! The HTTP framework, routing, and authentication all live in the
//! surrounding application; handlers here take and return plain domain
//! types so they can be mounted behind any router. Administrative
//! operations (forced sync) are expected to be gated by an elevated role
//! in that layer.
//!
//! A batch trigger returns a success-shaped count result even when every
//! item failed: per-item failures are data, not transport errors. Forced
//! sync and ingest propagate their failures as typed errors instead.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod api;
mod error;
mod scheduler;

pub use api::SyncApi;
pub use error::{ServerError, ServerResult};
pub use scheduler::SyncScheduler;
