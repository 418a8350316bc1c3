//! Error types for the printfleet system
//!
//! This module defines all error types used throughout the crate.
//!
//! Two layers exist:
//! - [`DeviceError`]: how a single call to a remote printer failed
//! - [`Error`]: everything the fleet service can report to its caller

use thiserror::Error;

/// Result type alias for printfleet operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failure of a single call against a printer's REST API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// Connection refused, DNS failure, or the per-call timeout elapsed
    #[error("Printer unreachable: {message}")]
    Unreachable {
        /// Transport error text
        message: String,
    },

    /// The printer answered with a non-2xx status
    #[error("Printer returned HTTP {status}: {body}")]
    Http {
        /// Remote status code
        status: u16,
        /// Remote response body, verbatim
        body: String,
    },

    /// The response body was not the structure we expected
    #[error("Malformed printer response: {message}")]
    Malformed {
        /// Parse error text
        message: String,
    },
}

impl DeviceError {
    /// Create an "unreachable" error
    pub fn unreachable(msg: impl Into<String>) -> Self {
        Self::Unreachable {
            message: msg.into(),
        }
    }

    /// Create a "malformed response" error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed {
            message: msg.into(),
        }
    }

    /// Create an HTTP status error carrying the remote body
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }
}

/// Core error type for the printfleet system
#[derive(Error, Debug)]
pub enum Error {
    /// Bad or missing input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Printer reference does not resolve to a registry entry
    #[error("Not found: {0}")]
    NotFound(String),

    /// Endpoint already present in the registry
    #[error("Duplicate printer: {0}")]
    Duplicate(String),

    /// Remote print state does not allow the requested command
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Registry could not be read or written
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// A call against the printer failed
    #[error(transparent)]
    Device(#[from] DeviceError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a duplicate error
    pub fn duplicate(msg: impl Into<String>) -> Self {
        Self::Duplicate(msg.into())
    }

    /// Create an invalid state error
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Create a persistence error
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// `true` for errors caused by the caller's input rather than by the
    /// dashboard or the printer
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_) | Self::NotFound(_) | Self::Duplicate(_) | Self::InvalidState(_)
        )
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
