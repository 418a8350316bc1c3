//! Daemon settings from `PRINTFLEET_*` environment variables
//!
//! | Variable                          | Default        |
//! |-----------------------------------|----------------|
//! | `PRINTFLEET_REGISTRY_TYPE`        | `file`         |
//! | `PRINTFLEET_REGISTRY_PATH`        | `config.json`  |
//! | `PRINTFLEET_BIND`                 | `0.0.0.0:5000` |
//! | `PRINTFLEET_CHECK_TIMEOUT_MS`     | `3000`         |
//! | `PRINTFLEET_TELEMETRY_TIMEOUT_MS` | `2000`         |
//! | `PRINTFLEET_COMMAND_TIMEOUT_MS`   | `3000`         |
//! | `PRINTFLEET_LIGHT_MACRO`          | `LIGHT_SWITCH` |
//! | `PRINTFLEET_LOCALE`               | `ru`           |
//! | `PRINTFLEET_LOG_LEVEL`            | `info`         |

use anyhow::{Context, Result};
use printfleet_core::{FleetConfig, RegistryConfig};
use std::env;
use tracing::Level;

/// Accepted range for every device timeout, in milliseconds
const TIMEOUT_RANGE_MS: std::ops::RangeInclusive<u64> = 100..=60_000;

/// Everything the daemon needs to start
#[derive(Debug, Clone)]
pub struct Settings {
    pub fleet: FleetConfig,
    pub log_level: String,
}

impl Settings {
    /// Load settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut fleet = FleetConfig::default();

        let registry_type = lookup("PRINTFLEET_REGISTRY_TYPE").unwrap_or_else(|| "file".to_string());
        fleet.registry = match registry_type.as_str() {
            "file" => RegistryConfig::File {
                path: lookup("PRINTFLEET_REGISTRY_PATH")
                    .unwrap_or_else(|| "config.json".to_string()),
            },
            "memory" => RegistryConfig::Memory,
            other => anyhow::bail!(
                "PRINTFLEET_REGISTRY_TYPE '{}' is not supported. \
                Supported types: file, memory",
                other
            ),
        };

        if let Some(bind) = lookup("PRINTFLEET_BIND") {
            fleet.server.bind = bind;
        }

        if let Some(ms) = millis(&lookup, "PRINTFLEET_CHECK_TIMEOUT_MS")? {
            fleet.device.check_timeout_ms = ms;
        }
        if let Some(ms) = millis(&lookup, "PRINTFLEET_TELEMETRY_TIMEOUT_MS")? {
            fleet.device.telemetry_timeout_ms = ms;
        }
        if let Some(ms) = millis(&lookup, "PRINTFLEET_COMMAND_TIMEOUT_MS")? {
            fleet.device.command_timeout_ms = ms;
        }

        if let Some(light_macro) = lookup("PRINTFLEET_LIGHT_MACRO") {
            fleet.device.light_macro = light_macro;
        }

        if let Some(locale) = lookup("PRINTFLEET_LOCALE") {
            fleet.locale = locale.parse()?;
        }

        Ok(Self {
            fleet,
            log_level: lookup("PRINTFLEET_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        self.fleet.validate()?;

        let device = &self.fleet.device;
        for (name, value) in [
            ("PRINTFLEET_CHECK_TIMEOUT_MS", device.check_timeout_ms),
            ("PRINTFLEET_TELEMETRY_TIMEOUT_MS", device.telemetry_timeout_ms),
            ("PRINTFLEET_COMMAND_TIMEOUT_MS", device.command_timeout_ms),
        ] {
            if !TIMEOUT_RANGE_MS.contains(&value) {
                anyhow::bail!(
                    "{} must be between {} and {} ms. Got: {}",
                    name,
                    TIMEOUT_RANGE_MS.start(),
                    TIMEOUT_RANGE_MS.end(),
                    value
                );
            }
        }

        self.level()?;
        Ok(())
    }

    /// Max tracing level from `log_level`
    pub fn level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "PRINTFLEET_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
    }
}

fn millis(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<u64>> {
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .with_context(|| format!("{} must be a number of milliseconds. Got: {}", key, raw))
        })
        .transpose()
}
