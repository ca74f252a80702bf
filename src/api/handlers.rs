//! HTTP endpoint handlers
//!
//! The HTTP layer is the command edge only; every handler forwards to the
//! observer-side coordination on `AppState` and reports what happened. A
//! misused command (zero start value, pause before start) comes back in the
//! response envelope with the state unchanged, never as a crash.

use std::sync::Arc;

use axum::{extract::State, response::Json};
use tracing::{info, warn};

use super::responses::{ApiResponse, HealthResponse, StartRequest, StatusResponse};
use crate::state::{AppState, ToggleOutcome};

/// Handle POST /start - begin a countdown, discarding any run in flight
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    body: Option<Json<StartRequest>>,
) -> Json<ApiResponse> {
    let initial = body
        .and_then(|Json(request)| request.initial)
        .unwrap_or(state.default_initial);

    match state.start_at(initial) {
        Ok(()) => {
            info!(initial, "start endpoint called, countdown started");
            Json(ApiResponse::ok(
                format!("countdown started from {} seconds", initial),
                state.countdown(),
            ))
        }
        Err(e) => {
            warn!("start endpoint rejected: {}", e);
            Json(ApiResponse::error(e.to_string(), state.countdown()))
        }
    }
}

/// Handle POST /toggle - pause or resume based on the engine's phase
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    match state.toggle_pause() {
        ToggleOutcome::Pausing {
            remaining,
            persisted,
        } => {
            info!(remaining, persisted, "toggle endpoint called, pausing");
            let message = if persisted {
                format!("countdown paused at {} seconds", remaining)
            } else {
                format!(
                    "countdown paused at {} seconds (snapshot write failed, run will not survive a restart)",
                    remaining
                )
            };
            Json(ApiResponse::ok(message, state.countdown()))
        }
        ToggleOutcome::Resuming { remaining } => {
            info!(remaining, "toggle endpoint called, resuming");
            Json(ApiResponse::ok(
                format!("countdown resuming from {} seconds", remaining),
                state.countdown(),
            ))
        }
        ToggleOutcome::Ignored => Json(ApiResponse::ignored(
            "no countdown to pause or resume".to_string(),
            state.countdown(),
        )),
    }
}

/// Handle GET /status - return the current countdown and server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        countdown: state.countdown(),
        default_initial: state.default_initial,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
