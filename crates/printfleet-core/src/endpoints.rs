//! Remote printer API paths (Moonraker)
//!
//! These are fixed by the printer controller, not by this crate.

/// Lightweight info endpoint used as the reachability check
pub const SERVER_INFO: &str = "/server/info";

/// Immediate firmware halt
pub const EMERGENCY_STOP: &str = "/printer/emergency_stop";

pub const PRINT_PAUSE: &str = "/printer/print/pause";

pub const PRINT_RESUME: &str = "/printer/print/resume";

pub const PRINT_CANCEL: &str = "/printer/print/cancel";

/// Run a G-code script (used for macros)
pub const GCODE_SCRIPT: &str = "/printer/gcode/script";

const OBJECTS_QUERY: &str = "/printer/objects/query";

/// Build an object-query path, e.g. `/printer/objects/query?extruder&heater_bed`
pub fn objects_query(objects: &[&str]) -> String {
    format!("{}?{}", OBJECTS_QUERY, objects.join("&"))
}
