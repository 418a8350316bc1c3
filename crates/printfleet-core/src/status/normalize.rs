//! Pure normalization helpers for printer status
//!
//! Everything here is free of I/O: filename handling, print state parsing
//! and the localized texts shown by the dashboard.

use serde_json::Value;

use crate::config::StatusLocale;

/// Print job state as reported by `print_stats.state`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintState {
    Standby,
    Printing,
    Paused,
    Complete,
    Error,
    Cancelled,
    /// Any token we do not know, including the `"unknown"` fallback
    Other(String),
}

impl PrintState {
    pub fn parse(token: &str) -> Self {
        match token {
            "standby" => PrintState::Standby,
            "printing" => PrintState::Printing,
            "paused" => PrintState::Paused,
            "complete" => PrintState::Complete,
            "error" => PrintState::Error,
            "cancelled" => PrintState::Cancelled,
            other => PrintState::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PrintState::Standby => "standby",
            PrintState::Printing => "printing",
            PrintState::Paused => "paused",
            PrintState::Complete => "complete",
            PrintState::Error => "error",
            PrintState::Cancelled => "cancelled",
            PrintState::Other(token) => token,
        }
    }

    /// A job is loaded and not finished
    pub fn is_active(&self) -> bool {
        matches!(self, PrintState::Printing | PrintState::Paused)
    }

    /// Display text for this state
    ///
    /// Unrecognized tokens are echoed back capitalized.
    pub fn display_text(&self, locale: StatusLocale) -> String {
        let known = match (locale, self) {
            (StatusLocale::Russian, PrintState::Printing) => "Печать",
            (StatusLocale::Russian, PrintState::Paused) => "Пауза",
            (StatusLocale::Russian, PrintState::Complete) => "Завершено",
            (StatusLocale::Russian, PrintState::Error) => "Ошибка",
            (StatusLocale::Russian, PrintState::Standby) => "Ожидание",
            (StatusLocale::Russian, PrintState::Cancelled) => "Отменено",
            (StatusLocale::English, PrintState::Printing) => "Printing",
            (StatusLocale::English, PrintState::Paused) => "Paused",
            (StatusLocale::English, PrintState::Complete) => "Complete",
            (StatusLocale::English, PrintState::Error) => "Error",
            (StatusLocale::English, PrintState::Standby) => "Standby",
            (StatusLocale::English, PrintState::Cancelled) => "Cancelled",
            (_, PrintState::Other(token)) => return capitalize(token),
        };
        known.to_string()
    }
}

/// Text shown when the reachability check fails
pub fn unreachable_text(locale: StatusLocale) -> &'static str {
    match locale {
        StatusLocale::Russian => "Принтер недоступен",
        StatusLocale::English => "Printer unreachable",
    }
}

/// Filename shown when `print_stats` has no filename at all
pub fn unknown_file_text(locale: StatusLocale) -> &'static str {
    match locale {
        StatusLocale::Russian => "Неизвестный файл",
        StatusLocale::English => "Unknown file",
    }
}

/// First character upper case, the rest lower case
pub fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Strip the last `.<ext>` segment from a filename
///
/// `"model.gcode"` → `"model"`, `"a.b.gcode"` → `"a.b"`, `""` → `""`.
pub fn strip_extension(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(dot) => &filename[..dot],
        None => filename,
    }
}

/// Estimate remaining print time in seconds from elapsed time and progress
pub fn remaining_time(state: &PrintState, print_duration: f64, progress: f64) -> Option<f64> {
    if !state.is_active() || progress <= 0.0 || progress > 1.0 || print_duration <= 0.0 {
        return None;
    }
    let total = print_duration / progress;
    Some((total - print_duration).max(0.0))
}

/// The `result.status` object of an object-query response
pub fn query_status(json: &Value) -> &Value {
    &json["result"]["status"]
}

/// `temperature` of a heater or sensor object, 0 when absent
pub fn temperature_of(status: &Value, object: &str) -> f64 {
    status[object]["temperature"].as_f64().unwrap_or(0.0)
}

/// First sensor whose name contains "CHAMBER" (case-insensitive)
///
/// `available_sensors` is a list of names on current firmware; older
/// versions report an object keyed by sensor name. Both are accepted.
pub fn find_chamber_sensor(available_sensors: &Value) -> Option<String> {
    let is_chamber = |name: &str| name.to_uppercase().contains("CHAMBER");

    match available_sensors {
        Value::Array(names) => names
            .iter()
            .filter_map(Value::as_str)
            .find(|name| is_chamber(name))
            .map(str::to_string),
        Value::Object(map) => map.keys().find(|name| is_chamber(name)).cloned(),
        _ => None,
    }
}
