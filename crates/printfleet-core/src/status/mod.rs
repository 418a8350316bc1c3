//! Status aggregation
//!
//! The [`StatusAggregator`] turns several independent queries against one
//! printer into a single flat [`PrinterStatus`].
//!
//! ## Stages
//!
//! ```text
//!            ┌────────────────────┐
//!            │ 1. /server/info    │── fails ──▶ StatusReport::Offline
//!            └────────────────────┘
//!                      │ ok
//!      ┌───────────────┼──────────────────────┐
//!      ▼               ▼                      ▼
//! ┌──────────┐  ┌──────────────────┐  ┌──────────────┐
//! │ 2. temps │  │ 3. heaters ──▶   │  │ 4. print     │
//! │          │  │    chamber read  │  │    stats     │
//! └──────────┘  └──────────────────┘  └──────────────┘
//!      │ default 0      │ default none        │ default "unknown"
//!      └───────────────┬┴─────────────────────┘
//!                      ▼
//!            5. normalize into PrinterStatus
//! ```
//!
//! Only the reachability check is fatal. Stages 2-4 run concurrently and each one falls
//! back to its default on any failure without affecting the others. The
//! two chamber calls stay sequential because the second needs the sensor
//! name found by the first.

pub mod normalize;

pub use normalize::PrintState;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::{DeviceConfig, StatusLocale};
use crate::endpoints;
use crate::error::DeviceError;
use crate::traits::{DeviceClient, DeviceRequest};

/// Flat status of a reachable printer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrinterStatus {
    /// Primary extruder temperature (°C)
    pub extruder_temp: f64,
    /// Secondary extruder temperature (°C)
    pub extruder1_temp: f64,
    /// Bed temperature (°C)
    pub bed_temp: f64,
    /// Chamber temperature (°C), 0 when no chamber sensor was found
    pub chamber_temp: f64,
    /// Sensor the chamber temperature was read from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chamber_sensor: Option<String>,
    /// Current or last print file
    pub filename: String,
    /// `filename` without its extension
    pub filename_without_ext: String,
    /// Raw print state token (`printing`, `paused`, ..., `unknown`)
    pub status: String,
    /// Localized display text for `status`
    #[serde(rename = "statusText")]
    pub status_text: String,
    /// Job progress in 0..=1
    pub progress: f64,
    /// Seconds spent printing
    pub print_duration: f64,
    /// Estimated seconds left, only while a job is active
    pub remaining_time: Option<f64>,
    /// Webcam capability flag
    pub webcam_available: bool,
}

/// Status of a printer that did not answer the reachability check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfflineStatus {
    /// Reachability error text
    pub error: String,
    /// Always `"offline"`
    pub status: String,
    /// Localized "printer unreachable" text
    #[serde(rename = "statusText")]
    pub status_text: String,
}

/// Outcome of a status query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatusReport {
    /// The printer answered the reachability check
    Online(PrinterStatus),
    /// The printer could not be reached
    Offline(OfflineStatus),
}

impl StatusReport {
    pub fn is_offline(&self) -> bool {
        matches!(self, StatusReport::Offline(_))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Temperatures {
    extruder: f64,
    extruder1: f64,
    bed: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct PrintStats {
    state: Option<String>,
    filename: Option<String>,
    print_duration: f64,
    progress: f64,
}

/// Builds [`StatusReport`]s for single printers
pub struct StatusAggregator {
    client: Arc<dyn DeviceClient>,
    check_timeout: Duration,
    telemetry_timeout: Duration,
    locale: StatusLocale,
}

impl StatusAggregator {
    pub fn new(client: Arc<dyn DeviceClient>, device: &DeviceConfig, locale: StatusLocale) -> Self {
        Self {
            client,
            check_timeout: device.check_timeout(),
            telemetry_timeout: device.telemetry_timeout(),
            locale,
        }
    }

    /// Query the printer at `base_url` and build its status
    ///
    /// Never fails: an unreachable printer yields [`StatusReport::Offline`],
    /// any later sub-query failure yields that sub-query's defaults.
    /// `webcam_available` is the registry's flag for this printer and is
    /// reported as-is.
    pub async fn status(&self, base_url: &str, webcam_available: bool) -> StatusReport {
        let ping = DeviceRequest::get(endpoints::SERVER_INFO, self.check_timeout);
        if let Err(e) = self.client.call(base_url, ping).await {
            debug!("Printer {} failed reachability check: {}", base_url, e);
            return StatusReport::Offline(OfflineStatus {
                error: e.to_string(),
                status: "offline".to_string(),
                status_text: normalize::unreachable_text(self.locale).to_string(),
            });
        }

        let (temperatures, chamber, print_stats) = tokio::join!(
            self.temperatures(base_url),
            self.chamber(base_url),
            self.print_stats(base_url),
        );

        let temperatures = or_default("temperatures", base_url, temperatures);
        let print_stats = or_default("print_stats", base_url, print_stats);
        let chamber = chamber.unwrap_or_else(|e| {
            debug!("No chamber temperature for {}: {}", base_url, e);
            None
        });

        StatusReport::Online(self.normalize(
            temperatures,
            chamber,
            print_stats,
            webcam_available,
        ))
    }

    async fn query(&self, base_url: &str, objects: &[&str]) -> Result<Value, DeviceError> {
        let request = DeviceRequest::get(endpoints::objects_query(objects), self.telemetry_timeout);
        self.client.call(base_url, request).await?.json()
    }

    async fn temperatures(&self, base_url: &str) -> Result<Temperatures, DeviceError> {
        let json = self
            .query(base_url, &["extruder", "extruder1", "heater_bed"])
            .await?;
        let status = normalize::query_status(&json);

        Ok(Temperatures {
            extruder: normalize::temperature_of(status, "extruder"),
            extruder1: normalize::temperature_of(status, "extruder1"),
            bed: normalize::temperature_of(status, "heater_bed"),
        })
    }

    /// Discover a chamber sensor, then read it
    async fn chamber(&self, base_url: &str) -> Result<Option<(String, f64)>, DeviceError> {
        let heaters = self.query(base_url, &["heaters"]).await?;
        let available = &normalize::query_status(&heaters)["heaters"]["available_sensors"];

        let Some(sensor) = normalize::find_chamber_sensor(available) else {
            return Ok(None);
        };

        let reading = self.query(base_url, &[sensor.as_str()]).await?;
        let temperature = normalize::temperature_of(normalize::query_status(&reading), &sensor);
        Ok(Some((sensor, temperature)))
    }

    async fn print_stats(&self, base_url: &str) -> Result<PrintStats, DeviceError> {
        let json = self
            .query(base_url, &["print_stats", "display_status"])
            .await?;
        let status = normalize::query_status(&json);
        let stats = &status["print_stats"];

        Ok(PrintStats {
            state: stats["state"].as_str().map(str::to_string),
            filename: stats["filename"].as_str().map(str::to_string),
            print_duration: stats["print_duration"].as_f64().unwrap_or(0.0),
            progress: status["display_status"]["progress"].as_f64().unwrap_or(0.0),
        })
    }

    fn normalize(
        &self,
        temperatures: Temperatures,
        chamber: Option<(String, f64)>,
        stats: PrintStats,
        webcam_available: bool,
    ) -> PrinterStatus {
        let state = PrintState::parse(stats.state.as_deref().unwrap_or("unknown"));
        let filename = stats
            .filename
            .unwrap_or_else(|| normalize::unknown_file_text(self.locale).to_string());
        let filename_without_ext = normalize::strip_extension(&filename).to_string();
        let (chamber_sensor, chamber_temp) = match chamber {
            Some((sensor, temp)) => (Some(sensor), temp),
            None => (None, 0.0),
        };

        PrinterStatus {
            extruder_temp: temperatures.extruder,
            extruder1_temp: temperatures.extruder1,
            bed_temp: temperatures.bed,
            chamber_temp,
            chamber_sensor,
            filename_without_ext,
            filename,
            status_text: state.display_text(self.locale),
            remaining_time: normalize::remaining_time(&state, stats.print_duration, stats.progress),
            status: state.as_str().to_string(),
            progress: stats.progress,
            print_duration: stats.print_duration,
            webcam_available,
        }
    }
}

/// Fall back to `T::default()` when a best-effort stage fails
fn or_default<T: Default>(stage: &str, base_url: &str, result: Result<T, DeviceError>) -> T {
    result.unwrap_or_else(|e| {
        warn!("Stage {} failed for {}, using defaults: {}", stage, base_url, e);
        T::default()
    })
}
