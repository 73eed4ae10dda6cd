//! # CardioTrack Gateway
//!
//! Adapter for the external IoT telemetry platform.
//!
//! This crate provides:
//! - [`TelemetryGateway`] - the trait the sync engine calls
//! - [`TelemetryPayload`] - the per-variable `{value, timestamp}` body
//! - [`HttpGateway`] - the wire implementation (JSON over HTTP POST)
//! - [`HttpClient`] - HTTP abstraction so tests never touch the network
//! - [`ReqwestClient`] - blocking `reqwest` implementation
//! - [`MockGateway`] - scripted test double with call recording
//!
//! ## Wire format
//!
//! Variables are posted per device label:
//!
//! ```text
//! POST {base_url}/devices/{device_label}
//! X-Auth-Token: <token>
//!
//! {"heart-rate": {"value": 75, "timestamp": 1700000000000}, ...}
//! ```
//!
//! The upstream platform is an append-style time-series sink; duplicate
//! writes for the same timestamp are tolerated, which is what makes
//! repeated sync passes safe.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod gateway;
mod http;
mod payload;

pub use error::{GatewayError, GatewayResult};
pub use gateway::{MockGateway, RecordedCall, TelemetryGateway};
pub use http::{GatewayConfig, HttpClient, HttpGateway, HttpResponse, ReqwestClient};
pub use payload::{GatewayReceipt, TelemetryPayload, VariableSample};
