//! Registry data model
//!
//! - [`PrinterRecord`]: one persisted printer endpoint
//! - [`PrinterRef`]: how callers point at a record (position or stable id)
//! - [`PrinterPatch`]: mutable fields of a record

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A registered printer
///
/// Field names follow the persisted registry layout
/// (`{"printers": [{"ip", "name", "webcam_available"}]}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrinterRecord {
    /// Stable identifier assigned at creation
    pub id: Uuid,

    /// Base URL of the printer's REST API, always with a scheme
    pub ip: String,

    /// Human label
    pub name: String,

    /// Webcam capability flag (always true for now)
    pub webcam_available: bool,

    /// When the printer was added
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl PrinterRecord {
    /// Create a record for a freshly added printer
    ///
    /// `endpoint` must already be normalized (see [`normalize_endpoint`]).
    pub(crate) fn new(endpoint: String, name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            ip: endpoint,
            name,
            webcam_available: true,
            added_at: Some(chrono::Utc::now()),
        }
    }

    /// Apply a patch in place
    pub fn apply(&mut self, patch: &PrinterPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
    }
}

/// Partial update of a [`PrinterRecord`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterPatch {
    /// New display name
    #[serde(default)]
    pub name: Option<String>,
}

impl PrinterPatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

/// Reference to a registry entry
///
/// Positional indices are what the dashboard's URLs carry; they shift when
/// an earlier printer is deleted. Ids never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrinterRef {
    /// Position in the registry's ordered list
    Index(usize),
    /// Stable identifier
    Id(Uuid),
}

impl PrinterRef {
    /// Parse a URL path segment: all digits is an index, anything else must be a UUID
    pub fn parse(segment: &str) -> Result<Self, crate::Error> {
        let segment = segment.trim();
        if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
            return segment
                .parse::<usize>()
                .map(PrinterRef::Index)
                .map_err(|e| crate::Error::invalid_input(format!("Invalid printer index: {}", e)));
        }

        Uuid::parse_str(segment)
            .map(PrinterRef::Id)
            .map_err(|_| crate::Error::invalid_input(format!("Invalid printer reference: {}", segment)))
    }

    /// Find the position of the referenced record in `printers`
    pub fn position(&self, printers: &[PrinterRecord]) -> Option<usize> {
        match *self {
            PrinterRef::Index(index) => (index < printers.len()).then_some(index),
            PrinterRef::Id(id) => printers.iter().position(|p| p.id == id),
        }
    }
}

impl fmt::Display for PrinterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrinterRef::Index(index) => write!(f, "#{}", index),
            PrinterRef::Id(id) => write!(f, "{}", id),
        }
    }
}

impl From<usize> for PrinterRef {
    fn from(index: usize) -> Self {
        PrinterRef::Index(index)
    }
}

impl From<Uuid> for PrinterRef {
    fn from(id: Uuid) -> Self {
        PrinterRef::Id(id)
    }
}

/// Normalize a user-supplied printer address into a base URL
///
/// - Surrounding whitespace is trimmed
/// - A bare host or IP gets an explicit `http://` scheme
/// - `http://` and `https://` URLs keep their scheme
/// - Trailing slashes are removed so paths can be appended directly
pub fn normalize_endpoint(raw: &str) -> Result<String, crate::Error> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(crate::Error::invalid_input("Printer address cannot be empty"));
    }

    let lower = trimmed.to_ascii_lowercase();
    let with_scheme = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    let normalized = with_scheme.trim_end_matches('/');
    if normalized.ends_with("://") {
        return Err(crate::Error::invalid_input(format!(
            "Printer address has no host: {}",
            raw
        )));
    }

    Ok(normalized.to_string())
}
