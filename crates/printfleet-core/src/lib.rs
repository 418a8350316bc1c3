// # printfleet-core
//
// Core library for the printfleet 3D-printer dashboard.
//
// ## Architecture Overview
//
// This library provides the logic behind the dashboard's control surface:
// - **RegistryStore**: Trait for the durable, ordered list of printers
// - **DeviceClient**: Trait for timed HTTP calls against one printer
// - **StatusAggregator**: Best-effort fan-out/fan-in of status queries
// - **CommandDispatcher**: State-gated printer commands
// - **PrinterFleet**: Service tying the above together for the facade
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from transports
// 2. **Best Effort**: Only an unreachable printer fails a status query
// 3. **Transparent Errors**: Printer-reported failures reach the caller verbatim
// 4. **Library-First**: The daemon is a thin layer over this crate

pub mod config;
pub mod dispatch;
pub mod endpoints;
pub mod error;
pub mod fleet;
pub mod model;
pub mod status;
pub mod store;
pub mod traits;

// Re-export core types for convenience
pub use config::{DeviceConfig, FleetConfig, RegistryConfig, ServerConfig, StatusLocale};
pub use dispatch::{CommandDispatcher, CommandOutcome, PrinterCommand};
pub use error::{DeviceError, Error, Result};
pub use fleet::PrinterFleet;
pub use model::{PrinterPatch, PrinterRecord, PrinterRef, normalize_endpoint};
pub use status::{OfflineStatus, PrintState, PrinterStatus, StatusAggregator, StatusReport};
pub use store::{FileRegistryStore, MemoryRegistryStore, open_store};
pub use traits::{DeviceClient, DeviceRequest, HttpMethod, RawResponse, RegistryStore};
