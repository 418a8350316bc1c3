//! Command dispatch
//!
//! The [`CommandDispatcher`] sends state-changing commands to a printer.
//!
//! - `emergency_stop`, `cancel_print`, `toggle_light`: one POST, success iff 2xx
//! - `pause_or_resume`: reads `print_stats.state` first and sends `pause`
//!   while printing, `resume` while paused, nothing otherwise
//!
//! A non-2xx answer is returned as [`DeviceError::Http`] with the remote
//! status and body untouched, so the caller can forward the firmware's
//! own diagnostics.
//!
//! The pause/resume state check is advisory: two concurrent calls can both
//! read `printing`. The firmware rejects whichever transition is no longer
//! valid.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::DeviceConfig;
use crate::endpoints;
use crate::error::{Error, Result};
use crate::status::{PrintState, normalize};
use crate::traits::{DeviceClient, DeviceRequest};

/// Commands the dashboard can send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrinterCommand {
    EmergencyStop,
    Pause,
    Resume,
    Cancel,
    ToggleLight,
}

impl fmt::Display for PrinterCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrinterCommand::EmergencyStop => "emergency_stop",
            PrinterCommand::Pause => "pause",
            PrinterCommand::Resume => "resume",
            PrinterCommand::Cancel => "cancel",
            PrinterCommand::ToggleLight => "toggle_light",
        };
        f.write_str(name)
    }
}

/// Result of a successful command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommandOutcome {
    /// The command that was actually sent
    pub command: PrinterCommand,
}

/// Sends commands to single printers
pub struct CommandDispatcher {
    client: Arc<dyn DeviceClient>,
    state_timeout: Duration,
    command_timeout: Duration,
    light_macro: String,
}

impl CommandDispatcher {
    pub fn new(client: Arc<dyn DeviceClient>, device: &DeviceConfig) -> Self {
        Self {
            client,
            state_timeout: device.check_timeout(),
            command_timeout: device.command_timeout(),
            light_macro: device.light_macro.clone(),
        }
    }

    /// Halt the printer immediately
    pub async fn emergency_stop(&self, base_url: &str) -> Result<CommandOutcome> {
        self.send(base_url, PrinterCommand::EmergencyStop).await
    }

    /// Cancel the current print job
    pub async fn cancel_print(&self, base_url: &str) -> Result<CommandOutcome> {
        self.send(base_url, PrinterCommand::Cancel).await
    }

    /// Run the configured light macro
    pub async fn toggle_light(&self, base_url: &str) -> Result<CommandOutcome> {
        self.send(base_url, PrinterCommand::ToggleLight).await
    }

    /// Pause a running print or resume a paused one
    ///
    /// # Returns
    ///
    /// - `Ok(outcome)`: `outcome.command` says which of the two was sent
    /// - `Err(Error::InvalidState)`: the printer is neither printing nor
    ///   paused; nothing was sent
    /// - `Err(Error::Device)`: the state check or the command failed
    pub async fn pause_or_resume(&self, base_url: &str) -> Result<CommandOutcome> {
        let state = self.current_state(base_url).await?;
        debug!("Printer {} is in state {}", base_url, state.as_str());

        let command = match state {
            PrintState::Printing => PrinterCommand::Pause,
            PrintState::Paused => PrinterCommand::Resume,
            other => {
                return Err(Error::invalid_state(format!(
                    "Invalid state for pause/resume: {}",
                    other.as_str()
                )));
            }
        };

        self.send(base_url, command).await
    }

    async fn current_state(&self, base_url: &str) -> Result<PrintState> {
        let request = DeviceRequest::get(
            endpoints::objects_query(&["print_stats"]),
            self.state_timeout,
        );
        let json = self.client.call(base_url, request).await?.json()?;
        let state = normalize::query_status(&json)["print_stats"]["state"]
            .as_str()
            .unwrap_or_default();
        Ok(PrintState::parse(state))
    }

    fn request_for(&self, command: PrinterCommand) -> DeviceRequest {
        let path = match command {
            PrinterCommand::EmergencyStop => endpoints::EMERGENCY_STOP,
            PrinterCommand::Pause => endpoints::PRINT_PAUSE,
            PrinterCommand::Resume => endpoints::PRINT_RESUME,
            PrinterCommand::Cancel => endpoints::PRINT_CANCEL,
            PrinterCommand::ToggleLight => {
                return DeviceRequest::post(endpoints::GCODE_SCRIPT, self.command_timeout)
                    .with_json(serde_json::json!({ "script": self.light_macro }));
            }
        };
        DeviceRequest::post(path, self.command_timeout)
    }

    async fn send(&self, base_url: &str, command: PrinterCommand) -> Result<CommandOutcome> {
        self.client
            .call(base_url, self.request_for(command))
            .await?;
        info!("Sent {} to {}", command, base_url);
        Ok(CommandOutcome { command })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopClient;

    #[async_trait::async_trait]
    impl DeviceClient for NoopClient {
        async fn call(
            &self,
            _base_url: &str,
            _request: DeviceRequest,
        ) -> std::result::Result<crate::traits::RawResponse, crate::error::DeviceError> {
            Ok(crate::traits::RawResponse::new(200, "{}"))
        }

        fn client_name(&self) -> &'static str {
            "noop"
        }
    }

    fn dispatcher() -> CommandDispatcher {
        let device = DeviceConfig {
            light_macro: "CHAMBER_LIGHTS".to_string(),
            ..DeviceConfig::default()
        };
        CommandDispatcher::new(Arc::new(NoopClient), &device)
    }

    #[test]
    fn light_request_runs_configured_macro() {
        let request = dispatcher().request_for(PrinterCommand::ToggleLight);
        assert_eq!(request.path, endpoints::GCODE_SCRIPT);
        assert_eq!(request.body, Some(serde_json::json!({"script": "CHAMBER_LIGHTS"})));
        assert_eq!(request.timeout, Duration::from_secs(3));
    }

    #[test]
    fn command_paths() {
        let dispatcher = dispatcher();
        assert_eq!(
            dispatcher.request_for(PrinterCommand::EmergencyStop).path,
            "/printer/emergency_stop"
        );
        assert_eq!(dispatcher.request_for(PrinterCommand::Pause).path, "/printer/print/pause");
        assert_eq!(dispatcher.request_for(PrinterCommand::Resume).path, "/printer/print/resume");
        assert_eq!(dispatcher.request_for(PrinterCommand::Cancel).path, "/printer/print/cancel");
    }

    #[test]
    fn command_display_names() {
        assert_eq!(PrinterCommand::EmergencyStop.to_string(), "emergency_stop");
        assert_eq!(PrinterCommand::ToggleLight.to_string(), "toggle_light");
    }
}
