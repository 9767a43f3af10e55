//! HTTP control API
//!
//! This module contains the endpoints that stand in for the tray menu and the
//! buttons of the break surfaces.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/pause", post(pause_handler))
        .route("/break-now", post(break_now_handler))
        .route("/break/accept", post(accept_handler))
        .route("/break/postpone", post(postpone_handler))
        .route("/break/refuse", post(refuse_handler))
        .route("/break/skip", post(skip_handler))
        .route("/activity", post(activity_handler))
        .route("/settings", get(get_settings_handler).put(put_settings_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .route("/quit", post(quit_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
