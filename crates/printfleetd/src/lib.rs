// # printfleetd
//
// HTTP facade for the printfleet dashboard.
//
// - `api`: axum routes over a `PrinterFleet`
// - `settings`: `PRINTFLEET_*` environment configuration
//
// The binary in `main.rs` wires these together; all printer logic lives in
// printfleet-core.

pub mod api;
pub mod settings;

pub use api::app;
pub use settings::Settings;
