//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use tracing::{error, info};

use crate::{
    settings::Settings,
    state::{AppState, BreakStateMachine},
};
use super::responses::{ApiResponse, HealthResponse, StatusResponse};

/// Default pause length offered by the menu
pub const DEFAULT_PAUSE_MINUTES: i64 = 60;
/// Longest pause a single request may ask for
pub const MAX_PAUSE_MINUTES: i64 = 24 * 60;

#[derive(Debug, Deserialize)]
pub struct PauseParams {
    pub minutes: Option<i64>,
}

/// Run `op` on the machine and answer with the resulting status.
fn run_operation<F>(state: &AppState, message: &str, op: F) -> Result<Json<ApiResponse>, StatusCode>
where
    F: FnOnce(&mut BreakStateMachine),
{
    match state.with_machine(|machine| {
        op(machine);
        machine.status()
    }) {
        Ok(status) => {
            info!("{}", message);
            Ok(Json(ApiResponse::ok(message.to_string(), status)))
        }
        Err(e) => {
            error!("{} failed: {}", message, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Like `run_operation` for decisions that only apply while a surface asks for them.
fn run_decision<F>(state: &AppState, message: &str, op: F) -> Result<Json<ApiResponse>, StatusCode>
where
    F: FnOnce(&mut BreakStateMachine) -> bool,
{
    match state.with_machine(|machine| (op(machine), machine.status())) {
        Ok((true, status)) => {
            info!("{}", message);
            Ok(Json(ApiResponse::ok(message.to_string(), status)))
        }
        Ok((false, status)) => Ok(Json(ApiResponse::ignored(
            format!("{}: nothing to answer", message),
            status,
        ))),
        Err(e) => {
            error!("{} failed: {}", message, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /pause - Toggle paused mode
pub async fn pause_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PauseParams>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let minutes = params
        .minutes
        .unwrap_or(DEFAULT_PAUSE_MINUTES)
        .clamp(1, MAX_PAUSE_MINUTES);
    run_operation(&state, "Pause toggled", |machine| machine.toggle_paused_mode(minutes))
}

/// Handle POST /break-now - Take a long break immediately
pub async fn break_now_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    run_operation(&state, "Long break requested", BreakStateMachine::take_long_break_now)
}

/// Handle POST /break/accept - Confirmation accepted
pub async fn accept_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    run_decision(&state, "Long break accepted", BreakStateMachine::accept_big_pause)
}

/// Handle POST /break/postpone - Postpone the long break
pub async fn postpone_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    run_decision(&state, "Long break postponed", BreakStateMachine::postpone_big_pause)
}

/// Handle POST /break/refuse - Refuse the long break
pub async fn refuse_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    run_decision(&state, "Long break refused", BreakStateMachine::refuse_big_pause)
}

/// Handle POST /break/skip - Skip the running long break
pub async fn skip_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    run_decision(&state, "Long break skipped", BreakStateMachine::skip_big_pause)
}

/// Handle POST /activity - The user is at the machine
pub async fn activity_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    state.activity.notify();
    run_operation(&state, "Activity reported", BreakStateMachine::on_user_activity)
}

/// Handle POST /quit - Close break surfaces and exit
pub async fn quit_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    run_operation(&state, "Exit requested", BreakStateMachine::request_exit)
}

/// Handle GET /settings - Current configuration
pub async fn get_settings_handler(State(state): State<Arc<AppState>>) -> Result<Json<Settings>, StatusCode> {
    state
        .with_machine(|machine| machine.settings().clone())
        .map(Json)
        .map_err(|e| {
            error!("Failed to read settings: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

/// Handle PUT /settings - Apply edited configuration
pub async fn put_settings_handler(
    State(state): State<Arc<AppState>>,
    Json(settings): Json<Settings>,
) -> Result<Json<Settings>, StatusCode> {
    state
        .with_machine(|machine| {
            machine.apply_edited_settings(settings);
            machine.settings().clone()
        })
        .map(|applied| {
            info!("Settings updated");
            Json(applied)
        })
        .map_err(|e| {
            error!("Failed to apply settings: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

/// Handle GET /status - Return current machine status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let statistics = match state.with_machine(|machine| machine.statistics().clone()) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to read statistics: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    Ok(Json(StatusResponse {
        machine: state.get_status(),
        statistics,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
