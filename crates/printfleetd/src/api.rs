//! Axum routes for the dashboard.
//!
//! Every handler is a thin shim over [`PrinterFleet`]. Printers are
//! addressed by `{id}`, which is either a registry index or a printer's
//! stable UUID. The underscore routes are the ones the single-page UI has
//! always called and stay available next to the resource-style ones.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use printfleet_core::{
    CommandOutcome, DeviceError, Error, PrinterFleet, PrinterPatch, PrinterRef, StatusReport,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, warn};

pub type AppState = Arc<PrinterFleet>;

/// Build the router over a fleet
pub fn app(fleet: AppState) -> Router {
    Router::new()
        .route("/config", get(get_config))
        .route("/printers", post(add_printer))
        .route("/printers/{id}", post(update_printer).delete(delete_printer))
        .route("/printers/{id}/status", get(printer_status))
        .route("/printers/{id}/emergency-stop", post(emergency_stop))
        .route("/printers/{id}/pause-resume", post(pause_resume))
        .route("/printers/{id}/cancel", post(cancel_print))
        .route("/printers/{id}/toggle-light", post(toggle_light))
        // Routes used by the dashboard page
        .route("/get_config", get(get_config))
        .route("/add_printer", post(add_printer))
        .route("/delete_printer/{id}", delete(delete_printer))
        .route("/printer_status/{id}", get(printer_status))
        .route("/update_printer/{id}", post(update_printer))
        .route("/emergency_stop/{id}", post(emergency_stop))
        .route("/pause_resume_print/{id}", post(pause_resume))
        .route("/cancel_print/{id}", post(cancel_print))
        .route("/toggle_light/{id}", post(toggle_light))
        .with_state(fleet)
}

/// Helper to create a JSON error response with a message and status code
fn json_error(message: &str, status: StatusCode) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Core error on its way to the HTTP client
#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            Error::InvalidInput(msg) | Error::Duplicate(msg) | Error::InvalidState(msg) => {
                json_error(&msg, StatusCode::BAD_REQUEST)
            }
            Error::NotFound(_) => json_error("Printer not found", StatusCode::NOT_FOUND),
            // Forward the printer's own answer
            Error::Device(DeviceError::Http { status, body }) => {
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                warn!("Printer rejected command with {}", status);
                (status, Json(json!({ "error": body }))).into_response()
            }
            Error::Device(err) => {
                warn!("Printer command failed: {}", err);
                json_error(&err.to_string(), StatusCode::INTERNAL_SERVER_ERROR)
            }
            other => {
                error!("Request failed: {}", other);
                json_error(&other.to_string(), StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

type ApiResult = Result<Response, ApiError>;

/// Resolve `{id}` for lookups; anything unparseable is simply not there
fn lookup(id: &str) -> Result<PrinterRef, ApiError> {
    PrinterRef::parse(id)
        .map_err(|_| ApiError(Error::not_found(format!("Printer not found: {}", id))))
}

fn invalid_id(err: Error) -> ApiError {
    match err {
        Error::NotFound(_) | Error::InvalidInput(_) => {
            ApiError(Error::invalid_input("Invalid printer ID"))
        }
        other => ApiError(other),
    }
}

fn command_done(outcome: CommandOutcome) -> Response {
    Json(json!({ "success": true, "command": outcome.command })).into_response()
}

#[derive(Debug, Deserialize)]
struct AddPrinterRequest {
    ip: String,
}

async fn get_config(State(fleet): State<AppState>) -> ApiResult {
    let printers = fleet.list().await?;
    Ok(Json(json!({ "printers": printers })).into_response())
}

async fn add_printer(State(fleet): State<AppState>, body: Bytes) -> ApiResult {
    let request: AddPrinterRequest = serde_json::from_slice(&body)
        .map_err(|_| ApiError(Error::invalid_input("Invalid request data")))?;

    let (index, printer) = fleet.add_printer(&request.ip).await?;
    Ok(Json(json!({ "success": true, "index": index, "printer": printer })).into_response())
}

async fn delete_printer(State(fleet): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let printer = PrinterRef::parse(&id).map_err(invalid_id)?;
    fleet.remove(&printer).await.map_err(invalid_id)?;
    Ok(Json(json!({ "success": true })).into_response())
}

/// Rename a printer
///
/// A body that is not a JSON object is treated as an empty patch.
async fn update_printer(
    State(fleet): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult {
    let printer = lookup(&id)?;
    let patch: PrinterPatch = serde_json::from_slice(&body).unwrap_or_default();

    let record = fleet.rename(&printer, &patch).await?;
    Ok(Json(json!({ "success": true, "printer": record })).into_response())
}

/// Live status of one printer
///
/// Aggregation runs in its own task so that a panic anywhere in it still
/// produces a response.
async fn printer_status(State(fleet): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let printer = lookup(&id)?;

    let task = tokio::spawn(async move { fleet.status(&printer).await });
    let report: StatusReport = match task.await {
        Ok(result) => result?,
        Err(e) => {
            error!("Status aggregation for {} aborted: {}", id, e);
            return Ok(json_error(
                &format!("Internal error: {}", e),
                StatusCode::INTERNAL_SERVER_ERROR,
            ));
        }
    };

    Ok(Json(report).into_response())
}

async fn emergency_stop(State(fleet): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let outcome = fleet.emergency_stop(&lookup(&id)?).await?;
    Ok(command_done(outcome))
}

async fn pause_resume(State(fleet): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let outcome = fleet.pause_or_resume(&lookup(&id)?).await?;
    Ok(command_done(outcome))
}

async fn cancel_print(State(fleet): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let outcome = fleet.cancel_print(&lookup(&id)?).await?;
    Ok(command_done(outcome))
}

async fn toggle_light(State(fleet): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let outcome = fleet.toggle_light(&lookup(&id)?).await?;
    Ok(command_done(outcome))
}
