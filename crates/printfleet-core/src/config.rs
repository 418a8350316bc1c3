//! Configuration types for the printfleet system
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main printfleet configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FleetConfig {
    /// Registry store configuration
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Remote device call settings
    #[serde(default)]
    pub device: DeviceConfig,

    /// HTTP facade settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Language of the status texts
    #[serde(default)]
    pub locale: StatusLocale,
}

impl FleetConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.registry.validate()?;
        self.device.validate()?;
        self.server.validate()?;
        Ok(())
    }
}

/// Registry store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegistryConfig {
    /// JSON file store
    File {
        /// Path to the registry file
        path: String,
    },

    /// In-memory store (not persistent)
    Memory,
}

impl RegistryConfig {
    /// Validate the registry configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            RegistryConfig::File { path } if path.trim().is_empty() => {
                Err(crate::Error::config("Registry file path cannot be empty"))
            }
            _ => Ok(()),
        }
    }

    /// Get the store type name
    pub fn type_name(&self) -> &'static str {
        match self {
            RegistryConfig::File { .. } => "file",
            RegistryConfig::Memory => "memory",
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig::File {
            path: default_registry_path(),
        }
    }
}

fn default_registry_path() -> String {
    "config.json".to_string()
}

/// Timeouts and macro names used when talking to printers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Timeout for the reachability check and for state checks (ms)
    #[serde(default = "default_check_timeout_ms")]
    pub check_timeout_ms: u64,

    /// Timeout for read-only telemetry queries (ms)
    #[serde(default = "default_telemetry_timeout_ms")]
    pub telemetry_timeout_ms: u64,

    /// Timeout for state-changing commands (ms)
    #[serde(default = "default_command_timeout_ms")]
    pub command_timeout_ms: u64,

    /// Name of the macro that toggles the printer light
    #[serde(default = "default_light_macro")]
    pub light_macro: String,
}

impl DeviceConfig {
    /// Validate the device configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.check_timeout_ms == 0 {
            return Err(crate::Error::config("Check timeout must be > 0"));
        }
        if self.telemetry_timeout_ms == 0 {
            return Err(crate::Error::config("Telemetry timeout must be > 0"));
        }
        if self.command_timeout_ms == 0 {
            return Err(crate::Error::config("Command timeout must be > 0"));
        }
        if self.light_macro.trim().is_empty() {
            return Err(crate::Error::config("Light macro name cannot be empty"));
        }
        Ok(())
    }

    pub fn check_timeout(&self) -> Duration {
        Duration::from_millis(self.check_timeout_ms)
    }

    pub fn telemetry_timeout(&self) -> Duration {
        Duration::from_millis(self.telemetry_timeout_ms)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            check_timeout_ms: default_check_timeout_ms(),
            telemetry_timeout_ms: default_telemetry_timeout_ms(),
            command_timeout_ms: default_command_timeout_ms(),
            light_macro: default_light_macro(),
        }
    }
}

fn default_check_timeout_ms() -> u64 {
    3000
}

fn default_telemetry_timeout_ms() -> u64 {
    2000
}

fn default_command_timeout_ms() -> u64 {
    3000
}

fn default_light_macro() -> String {
    "LIGHT_SWITCH".to_string()
}

/// HTTP facade configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl ServerConfig {
    /// Validate the server configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.bind
            .parse::<std::net::SocketAddr>()
            .map(|_| ())
            .map_err(|e| crate::Error::config(format!("Invalid bind address '{}': {}", self.bind, e)))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:5000".to_string()
}

/// Language used for `statusText`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLocale {
    /// Russian texts
    #[default]
    Russian,
    /// English texts
    English,
}

impl StatusLocale {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusLocale::Russian => "ru",
            StatusLocale::English => "en",
        }
    }
}

impl std::str::FromStr for StatusLocale {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ru" | "russian" => Ok(StatusLocale::Russian),
            "en" | "english" => Ok(StatusLocale::English),
            other => Err(crate::Error::config(format!(
                "Unknown locale '{}'. Supported: ru, en",
                other
            ))),
        }
    }
}
