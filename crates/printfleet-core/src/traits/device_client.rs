// # Device Client Trait
//
// Defines the interface for talking to a single printer's REST API.
//
// ## Contract
//
// `call(base_url, request)` performs exactly one HTTP request bounded by
// `request.timeout` and classifies failures:
//
// - `DeviceError::Unreachable`: connection failure or timeout
// - `DeviceError::Http`: non-2xx status, body kept verbatim
// - `DeviceError::Malformed`: body not parseable (see [`RawResponse::json`])
//
// No retries. The dashboard UI polls repeatedly, so a fast failure is
// preferable to a blocked request.
//
// ## Implementations
//
// - reqwest-based: `printfleet-http` crate

use async_trait::async_trait;
use std::time::Duration;

use crate::error::DeviceError;

/// HTTP method of a device request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// A single request against a printer
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Path relative to the printer's base URL, including any query string
    pub path: String,
    /// Optional JSON body
    pub body: Option<serde_json::Value>,
    /// Upper bound for the whole call
    pub timeout: Duration,
}

impl DeviceRequest {
    /// Create a GET request
    pub fn get(path: impl Into<String>, timeout: Duration) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            body: None,
            timeout,
        }
    }

    /// Create a POST request without a body
    pub fn post(path: impl Into<String>, timeout: Duration) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            body: None,
            timeout,
        }
    }

    /// Attach a JSON body
    pub fn with_json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Successful (2xx) response from a printer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body text
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Parse the body as JSON
    pub fn json(&self) -> Result<serde_json::Value, DeviceError> {
        serde_json::from_str(&self.body).map_err(|e| DeviceError::malformed(e.to_string()))
    }
}

/// Trait for device client implementations
///
/// # Thread Safety
///
/// Implementations must be thread-safe: one client is shared by every
/// request the facade handles.
///
/// # Responsibilities
///
/// ## Allowed
/// - ✅ Perform one HTTP call per invocation against `base_url`
/// - ✅ Enforce `request.timeout`
/// - ✅ Translate transport failures into [`DeviceError`]
///
/// ## Not Allowed
/// - ❌ Retry (callers decide what a failure means)
/// - ❌ Interpret response bodies beyond the status code
/// - ❌ Cache responses
#[async_trait]
pub trait DeviceClient: Send + Sync {
    /// Perform a single request against the printer at `base_url`
    ///
    /// # Returns
    ///
    /// - `Ok(RawResponse)`: the printer answered with a 2xx status
    /// - `Err(DeviceError)`: see the module-level contract
    async fn call(&self, base_url: &str, request: DeviceRequest)
    -> Result<RawResponse, DeviceError>;

    /// Get the client name (for logging/debugging)
    fn client_name(&self) -> &'static str;
}
