//! Test doubles and common utilities for contract tests
//!
//! The scripted device client answers each request path with a canned
//! response and records every call, so tests can assert exactly which
//! requests the core issued.

#![allow(dead_code)]

use printfleet_core::error::DeviceError;
use printfleet_core::traits::{DeviceClient, DeviceRequest, HttpMethod, RawResponse};
use printfleet_core::{FleetConfig, MemoryRegistryStore, PrinterFleet};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A request as seen by the scripted client
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub base_url: String,
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
}

/// A DeviceClient that answers from a path → response script
///
/// Unscripted paths fail with HTTP 404.
#[derive(Default)]
pub struct ScriptedDeviceClient {
    responses: Mutex<HashMap<String, Result<RawResponse, DeviceError>>>,
    calls: Mutex<Vec<RecordedCall>>,
    call_count: AtomicUsize,
}

impl ScriptedDeviceClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `path` with a 200 and the given JSON body
    pub fn respond_json(&self, path: impl Into<String>, body: Value) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .insert(path.into(), Ok(RawResponse::new(200, body.to_string())));
        self
    }

    /// Answer `path` with a 200 and a raw body
    pub fn respond_raw(&self, path: impl Into<String>, body: &str) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .insert(path.into(), Ok(RawResponse::new(200, body)));
        self
    }

    /// Fail `path` with the given error
    pub fn fail(&self, path: impl Into<String>, error: DeviceError) -> &Self {
        self.responses.lock().unwrap().insert(path.into(), Err(error));
        self
    }

    /// Get the number of calls made
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Paths of every call made so far, in order
    pub fn paths(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.path).collect()
    }

    /// Paths of every POST made so far
    pub fn posted_paths(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == HttpMethod::Post)
            .map(|c| c.path)
            .collect()
    }
}

#[async_trait::async_trait]
impl DeviceClient for ScriptedDeviceClient {
    async fn call(
        &self,
        base_url: &str,
        request: DeviceRequest,
    ) -> Result<RawResponse, DeviceError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(RecordedCall {
            base_url: base_url.to_string(),
            method: request.method,
            path: request.path.clone(),
            body: request.body.clone(),
        });

        self.responses
            .lock()
            .unwrap()
            .get(&request.path)
            .cloned()
            .unwrap_or_else(|| Err(DeviceError::http(404, "not scripted")))
    }

    fn client_name(&self) -> &'static str {
        "scripted"
    }
}

pub const SERVER_INFO: &str = "/server/info";
pub const TEMPERATURES: &str = "/printer/objects/query?extruder&extruder1&heater_bed";
pub const HEATERS: &str = "/printer/objects/query?heaters";
pub const PRINT_STATS: &str = "/printer/objects/query?print_stats&display_status";
pub const STATE_CHECK: &str = "/printer/objects/query?print_stats";

/// Wrap an object map the way an object-query response does
pub fn query_result(status: Value) -> Value {
    json!({ "result": { "status": status } })
}

/// Script a reachable printer in the given print state
pub fn script_online(client: &ScriptedDeviceClient, state: &str, filename: &str) {
    client
        .respond_json(SERVER_INFO, json!({"result": {"klippy_state": "ready"}}))
        .respond_json(
            TEMPERATURES,
            query_result(json!({
                "extruder": {"temperature": 210.5},
                "extruder1": {"temperature": 25.0},
                "heater_bed": {"temperature": 60.0}
            })),
        )
        .respond_json(
            HEATERS,
            query_result(json!({"heaters": {"available_sensors": ["extruder", "heater_bed"]}})),
        )
        .respond_json(
            PRINT_STATS,
            query_result(json!({
                "print_stats": {"state": state, "filename": filename, "print_duration": 300.0},
                "display_status": {"progress": 0.5}
            })),
        )
        .respond_json(
            STATE_CHECK,
            query_result(json!({"print_stats": {"state": state}})),
        );
}

/// A fleet over an in-memory registry and the given client
pub fn memory_fleet(client: Arc<ScriptedDeviceClient>) -> (PrinterFleet, MemoryRegistryStore) {
    let store = MemoryRegistryStore::new();
    let fleet = PrinterFleet::new(Arc::new(store.clone()), client, &FleetConfig::default());
    (fleet, store)
}
