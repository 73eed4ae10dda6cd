//! Outbound payload types.

use serde::Serialize;
use std::collections::BTreeMap;

/// One variable update: a value and the moment it was measured.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableSample {
    /// The value to record. Numeric for plain readings; a JSON-encoded
    /// string for series and structured payloads.
    pub value: serde_json::Value,
    /// Measurement time in epoch milliseconds.
    pub timestamp: i64,
}

/// The body of a device update: variable name to sample.
///
/// A `BTreeMap` keeps serialization order deterministic, which keeps wire
/// captures and test assertions stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TelemetryPayload(BTreeMap<String, VariableSample>);

impl TelemetryPayload {
    /// Creates an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variable sample.
    pub fn insert(
        &mut self,
        variable: impl Into<String>,
        value: serde_json::Value,
        timestamp_ms: i64,
    ) {
        self.0.insert(
            variable.into(),
            VariableSample {
                value,
                timestamp: timestamp_ms,
            },
        );
    }

    /// Looks up a sample by variable name.
    pub fn get(&self, variable: &str) -> Option<&VariableSample> {
        self.0.get(variable)
    }

    /// Number of variables in the payload.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the payload carries no variables.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over variable names.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// What the platform hands back for an accepted update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatewayReceipt {
    /// Identifier the platform assigned to the update, when it reports one.
    pub external_id: Option<String>,
}

impl GatewayReceipt {
    /// A receipt carrying an upstream id.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            external_id: Some(id.into()),
        }
    }
}
