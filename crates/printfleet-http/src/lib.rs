// # HTTP Device Client
//
// This crate provides the reqwest-based DeviceClient for the printfleet
// system.
//
// ## Purpose
//
// Talks to a Moonraker-style REST API on a single printer. One client
// (and one connection pool) is shared by every printer in the fleet; the
// base URL is passed per call.
//
// ## Error Mapping
//
// - connect failure, timeout, broken body → `DeviceError::Unreachable`
// - non-2xx status                        → `DeviceError::Http` (body verbatim)
//
// Body parsing happens in the core (`RawResponse::json`), which is where
// `DeviceError::Malformed` comes from.

use printfleet_core::error::DeviceError;
use printfleet_core::traits::{DeviceClient, DeviceRequest, HttpMethod, RawResponse};
use printfleet_core::{Error, Result};

use async_trait::async_trait;
use tracing::{debug, trace};

/// reqwest-backed client for printer REST APIs
#[derive(Debug, Clone)]
pub struct HttpDeviceClient {
    /// Shared HTTP client (connection pool)
    client: reqwest::Client,
}

impl HttpDeviceClient {
    /// Create a client with its own connection pool
    ///
    /// No client-wide timeout is set: every call carries its own.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("printfleet/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Wrap an existing reqwest client
    pub fn from_reqwest(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn url(base_url: &str, path: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), path)
    }
}

/// Classify a transport-level reqwest failure
fn transport_error(err: reqwest::Error, request: &DeviceRequest) -> DeviceError {
    if err.is_timeout() {
        DeviceError::unreachable(format!(
            "Request to {} timed out after {}ms",
            request.path,
            request.timeout.as_millis()
        ))
    } else if err.is_connect() {
        DeviceError::unreachable(format!("Connection failed: {}", err))
    } else {
        DeviceError::unreachable(format!("Request failed: {}", err))
    }
}

#[async_trait]
impl DeviceClient for HttpDeviceClient {
    async fn call(
        &self,
        base_url: &str,
        request: DeviceRequest,
    ) -> std::result::Result<RawResponse, DeviceError> {
        let url = Self::url(base_url, &request.path);
        trace!("{:?} {}", request.method, url);

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
        };
        builder = builder.timeout(request.timeout);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| transport_error(e, &request))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(e, &request))?;

        if !status.is_success() {
            debug!("{} answered {} for {}", base_url, status, request.path);
            return Err(DeviceError::http(status.as_u16(), body));
        }

        Ok(RawResponse::new(status.as_u16(), body))
    }

    fn client_name(&self) -> &'static str {
        "http"
    }
}
