// # printfleetd - Printer Dashboard Daemon
//
// This daemon is a thin integration layer:
// 1. Reading configuration from environment variables
// 2. Initializing the runtime
// 3. Opening the printer registry and the HTTP device client
// 4. Serving the dashboard API until SIGTERM/SIGINT
//
// ## Configuration
//
// All configuration is done via environment variables, see
// `printfleetd::settings` for the full list.
//
// ## Example
//
// ```bash
// export PRINTFLEET_REGISTRY_PATH=/var/lib/printfleet/config.json
// export PRINTFLEET_BIND=0.0.0.0:5000
// export PRINTFLEET_LOCALE=en
//
// printfleetd
// ```

use anyhow::Result;
use printfleet_core::{PrinterFleet, open_store};
use printfleet_http::HttpDeviceClient;
use printfleetd::Settings;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DaemonExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DaemonExitCode> for ExitCode {
    fn from(code: DaemonExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return DaemonExitCode::ConfigError.into();
        }
    };

    if let Err(e) = settings.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return DaemonExitCode::ConfigError.into();
    }

    let log_level = match settings.level() {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Configuration validation error: {:#}", e);
            return DaemonExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DaemonExitCode::ConfigError.into();
    }

    info!("Starting printfleetd");
    info!("Registry store type: {}", settings.fleet.registry.type_name());

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DaemonExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        match run_daemon(settings).await {
            Ok(()) => DaemonExitCode::CleanShutdown,
            Err(e @ DaemonError::Startup(_)) => {
                error!("{}", e);
                DaemonExitCode::ConfigError
            }
            Err(e) => {
                error!("{}", e);
                DaemonExitCode::RuntimeError
            }
        }
    });

    result.into()
}

/// Failures of the running daemon, split by exit code
#[derive(Debug, thiserror::Error)]
enum DaemonError {
    #[error("Startup error: {0:#}")]
    Startup(anyhow::Error),
    #[error("Daemon error: {0:#}")]
    Runtime(anyhow::Error),
}

/// Run the daemon
async fn run_daemon(settings: Settings) -> std::result::Result<(), DaemonError> {
    let store = open_store(&settings.fleet.registry)
        .await
        .map_err(|e| DaemonError::Startup(e.into()))?;
    let client = HttpDeviceClient::new().map_err(|e| DaemonError::Startup(e.into()))?;

    let fleet = Arc::new(PrinterFleet::new(
        store.clone(),
        Arc::new(client),
        &settings.fleet,
    ));

    let listener = tokio::net::TcpListener::bind(settings.fleet.server.bind.as_str())
        .await
        .map_err(|e| {
            DaemonError::Startup(anyhow::anyhow!(
                "Failed to bind {}: {}",
                settings.fleet.server.bind,
                e
            ))
        })?;

    info!("Dashboard API listening on {}", settings.fleet.server.bind);

    axum::serve(listener, printfleetd::app(fleet))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| DaemonError::Runtime(e.into()))?;

    info!("Shutting down daemon");
    store
        .flush()
        .await
        .map_err(|e| DaemonError::Runtime(e.into()))?;

    Ok(())
}

/// Resolves once a shutdown signal arrives
///
/// If the handlers cannot be installed the server keeps running; it can
/// still be stopped by the supervisor.
async fn shutdown_signal() {
    match wait_for_shutdown().await {
        Ok(signal) => info!("Received shutdown signal: {}", signal),
        Err(e) => {
            error!("Shutdown signal handling unavailable: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    let received = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    Ok(received)
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
