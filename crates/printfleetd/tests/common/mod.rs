//! Test doubles for router tests

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use printfleet_core::error::DeviceError;
use printfleet_core::traits::{DeviceClient, DeviceRequest, HttpMethod, RawResponse};
use printfleet_core::{FleetConfig, MemoryRegistryStore, PrinterFleet};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// DeviceClient answering from a path → response table
///
/// Unscripted paths are unreachable.
#[derive(Default)]
pub struct FakePrinter {
    responses: Mutex<HashMap<String, Result<RawResponse, DeviceError>>>,
    posts: Mutex<Vec<String>>,
    call_count: AtomicUsize,
}

impl FakePrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok(&self, path: &str, body: Value) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .insert(path.to_string(), Ok(RawResponse::new(200, body.to_string())));
        self
    }

    pub fn fail(&self, path: &str, error: DeviceError) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .insert(path.to_string(), Err(error));
        self
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn posts(&self) -> Vec<String> {
        self.posts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DeviceClient for FakePrinter {
    async fn call(
        &self,
        _base_url: &str,
        request: DeviceRequest,
    ) -> Result<RawResponse, DeviceError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if request.method == HttpMethod::Post {
            self.posts.lock().unwrap().push(request.path.clone());
        }

        self.responses
            .lock()
            .unwrap()
            .get(&request.path)
            .cloned()
            .unwrap_or_else(|| Err(DeviceError::unreachable("connection refused")))
    }

    fn client_name(&self) -> &'static str {
        "fake"
    }
}

/// DeviceClient that panics on every call
pub struct PanickingPrinter;

#[async_trait::async_trait]
impl DeviceClient for PanickingPrinter {
    async fn call(
        &self,
        _base_url: &str,
        _request: DeviceRequest,
    ) -> Result<RawResponse, DeviceError> {
        panic!("printer client bug");
    }

    fn client_name(&self) -> &'static str {
        "panicking"
    }
}

/// Router over an in-memory fleet
pub fn router(client: Arc<dyn DeviceClient>) -> (Router, MemoryRegistryStore) {
    let store = MemoryRegistryStore::new();
    let fleet = PrinterFleet::new(Arc::new(store.clone()), client, &FleetConfig::default());
    (printfleetd::app(Arc::new(fleet)), store)
}

/// Send one request and return status plus body text
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

/// Send one request and parse the body as JSON
pub async fn send_json(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let (status, text) = send(app, method, uri, body).await;
    let json = serde_json::from_str(&text).unwrap_or(Value::String(text));
    (status, json)
}
