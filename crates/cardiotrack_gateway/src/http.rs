//! HTTP wire implementation of the gateway.
//!
//! The actual HTTP client sits behind the [`HttpClient`] trait so the
//! wire logic (URL shape, auth header, status handling, receipt parsing)
//! can be tested without a network, and so a different client library can
//! be dropped in if needed.

use crate::error::{GatewayError, GatewayResult};
use crate::gateway::TelemetryGateway;
use crate::payload::{GatewayReceipt, TelemetryPayload};
use std::time::Duration;

/// How much response body to keep when storing an upstream error.
const ERROR_BODY_LIMIT: usize = 512;

/// Configuration for the HTTP gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the telemetry API, e.g. `https://industrial.api.ubidots.com/api/v1.6`.
    pub api_url: String,
    /// Auth token sent with every request.
    pub token: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl GatewayConfig {
    /// Creates a configuration with the default 10 second timeout.
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            token: token.into(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// A raw HTTP response: status code and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: String,
}

/// Minimal HTTP client abstraction.
///
/// Implement this to provide the actual transport. The crate ships
/// [`ReqwestClient`]; tests use in-process implementations.
pub trait HttpClient: Send + Sync {
    /// Sends a JSON POST with the given headers and returns the response.
    ///
    /// Implementations must honor `timeout` and map client-side timeouts
    /// to [`GatewayError::Timeout`].
    fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &serde_json::Value,
        timeout: Duration,
    ) -> GatewayResult<HttpResponse>;
}

/// HTTP-based telemetry gateway.
///
/// Posts variable updates as JSON to `{api_url}/devices/{device_label}`
/// with an `X-Auth-Token` header, and reads the optional upstream id out
/// of the response body.
pub struct HttpGateway<C: HttpClient> {
    config: GatewayConfig,
    client: C,
}

impl<C: HttpClient> HttpGateway<C> {
    /// Creates a gateway over the given client.
    pub fn new(config: GatewayConfig, client: C) -> Self {
        Self { config, client }
    }

    /// Returns the configured base URL.
    pub fn api_url(&self) -> &str {
        &self.config.api_url
    }

    fn device_url(&self, device_label: &str) -> String {
        format!(
            "{}/devices/{}",
            self.config.api_url.trim_end_matches('/'),
            device_label
        )
    }
}

impl<C: HttpClient> TelemetryGateway for HttpGateway<C> {
    fn post_variables(
        &self,
        device_label: &str,
        payload: &TelemetryPayload,
    ) -> GatewayResult<GatewayReceipt> {
        let body = serde_json::to_value(payload)
            .map_err(|e| GatewayError::InvalidPayload(e.to_string()))?;

        let url = self.device_url(device_label);
        let headers = [
            ("X-Auth-Token", self.config.token.as_str()),
            ("Content-Type", "application/json"),
        ];

        let response = self
            .client
            .post_json(&url, &headers, &body, self.config.timeout)?;

        if !(200..300).contains(&response.status) {
            return Err(GatewayError::Http {
                status: response.status,
                body: truncate_utf8(response.body, ERROR_BODY_LIMIT),
            });
        }

        // The platform reports an update id on success, but the field is
        // optional and some response shapes omit it entirely.
        let external_id = serde_json::from_str::<serde_json::Value>(&response.body)
            .ok()
            .and_then(|v| v.get("id").and_then(|id| id.as_str()).map(String::from));

        Ok(GatewayReceipt { external_id })
    }
}

/// Truncates to at most `limit` bytes, backing off to the nearest char
/// boundary so multi-byte text never splits mid-character.
fn truncate_utf8(mut body: String, limit: usize) -> String {
    if body.len() > limit {
        let mut end = limit;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
    }
    body
}

/// Blocking `reqwest` implementation of [`HttpClient`].
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Builds a client.
    pub fn new() -> GatewayResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &serde_json::Value,
        timeout: Duration,
    ) -> GatewayResult<HttpResponse> {
        let mut request = self.client.post(url).timeout(timeout).json(body);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout
            } else {
                GatewayError::Transport(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}
