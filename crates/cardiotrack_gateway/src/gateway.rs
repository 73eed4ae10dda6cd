//! Gateway trait and test double.

use crate::error::{GatewayError, GatewayResult};
use crate::payload::{GatewayReceipt, TelemetryPayload};
use parking_lot::Mutex;
use std::collections::VecDeque;

/// The remote time-series sink the sync engine pushes measurements to.
///
/// This trait abstracts the telemetry platform, allowing the wire
/// implementation ([`HttpGateway`](crate::HttpGateway)) to be swapped for
/// [`MockGateway`] in tests. Implementations perform exactly one request
/// per call; retry policy lives with the caller.
pub trait TelemetryGateway: Send + Sync {
    /// Posts a batch of variable updates for one device.
    ///
    /// Fails with a [`GatewayError`] on timeout, transport failure, or a
    /// non-success HTTP status.
    fn post_variables(
        &self,
        device_label: &str,
        payload: &TelemetryPayload,
    ) -> GatewayResult<GatewayReceipt>;
}

/// One recorded [`MockGateway`] invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// Device label the payload was posted for.
    pub device_label: String,
    /// The posted payload.
    pub payload: TelemetryPayload,
}

/// A scripted gateway for testing.
///
/// Responses are consumed front-to-back from a queue; when the queue is
/// empty the configured default response (success without an id, unless
/// changed) is returned. Every call is recorded for later assertions.
pub struct MockGateway {
    responses: Mutex<VecDeque<GatewayResult<GatewayReceipt>>>,
    default_response: Mutex<GatewayResult<GatewayReceipt>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockGateway {
    /// Creates a gateway that succeeds (without an external id) by default.
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            default_response: Mutex::new(Ok(GatewayReceipt::default())),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queues an arbitrary scripted result.
    pub fn enqueue(&self, result: GatewayResult<GatewayReceipt>) {
        self.responses.lock().push_back(result);
    }

    /// Queues a success carrying the given upstream id.
    pub fn enqueue_success(&self, external_id: impl Into<String>) {
        self.enqueue(Ok(GatewayReceipt::with_id(external_id)));
    }

    /// Queues a failure.
    pub fn enqueue_error(&self, error: GatewayError) {
        self.enqueue(Err(error));
    }

    /// Replaces the fallback used when the queue is empty.
    pub fn set_default(&self, result: GatewayResult<GatewayReceipt>) {
        *self.default_response.lock() = result;
    }

    /// All calls made so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryGateway for MockGateway {
    fn post_variables(
        &self,
        device_label: &str,
        payload: &TelemetryPayload,
    ) -> GatewayResult<GatewayReceipt> {
        self.calls.lock().push(RecordedCall {
            device_label: device_label.to_string(),
            payload: payload.clone(),
        });

        match self.responses.lock().pop_front() {
            Some(result) => result,
            None => self.default_response.lock().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_payload() -> TelemetryPayload {
        let mut payload = TelemetryPayload::new();
        payload.insert("heart-rate", serde_json::json!(72), 1_700_000_000_000);
        payload
    }

    #[test]
    fn default_response_is_success() {
        let gateway = MockGateway::new();
        let receipt = gateway
            .post_variables("cardio-01", &sample_payload())
            .unwrap();
        assert!(receipt.external_id.is_none());
        assert_eq!(gateway.call_count(), 1);
    }

    #[test]
    fn scripted_responses_consumed_in_order() {
        let gateway = MockGateway::new();
        gateway.enqueue_success("X123");
        gateway.enqueue_error(GatewayError::Timeout);

        let receipt = gateway
            .post_variables("cardio-01", &sample_payload())
            .unwrap();
        assert_eq!(receipt.external_id.as_deref(), Some("X123"));

        let err = gateway
            .post_variables("cardio-01", &sample_payload())
            .unwrap_err();
        assert!(err.is_timeout());

        // Queue drained, falls back to default.
        assert!(gateway
            .post_variables("cardio-01", &sample_payload())
            .is_ok());
    }

    #[test]
    fn calls_are_recorded() {
        let gateway = MockGateway::new();
        gateway
            .post_variables("cardio-01", &sample_payload())
            .unwrap();

        let calls = gateway.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].device_label, "cardio-01");
        assert!(calls[0].payload.get("heart-rate").is_some());
    }
}
