//! Core traits for the printfleet system
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`DeviceClient`]: Issue timed HTTP calls against a printer's REST API
//! - [`RegistryStore`]: Durable, ordered list of registered printers

pub mod device_client;
pub mod registry_store;

pub use device_client::{DeviceClient, DeviceRequest, HttpMethod, RawResponse};
pub use registry_store::{RecordBuilder, RegistryStore};
