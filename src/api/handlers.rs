//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json};
use serde::Deserialize;
use tracing::{error, info, warn};

use super::responses::{ApiResponse, GameView, HealthResponse, StatusResponse};
use crate::state::{AppState, Player, TimerSnapshot};

/// Request body for POST /game/start; an absent body or field uses the
/// persisted setting
#[derive(Debug, Clone, Deserialize)]
pub struct StartGameRequest {
    pub minutes: Option<i64>,
}

/// Handle POST /game/start - configure and mount a new game
pub async fn game_start_handler(
    State(state): State<Arc<AppState>>,
    body: Option<Json<StartGameRequest>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let requested = match body.and_then(|Json(request)| request.minutes) {
        // Non-positive requests flow through as zero so the fallback to the
        // default allotment happens in one place
        Some(minutes) if minutes > 0 => minutes as u64,
        Some(minutes) => {
            warn!("Requested time of {} minutes is not positive", minutes);
            0
        }
        None => state.settings.time_minutes(),
    };

    match state.start_game(requested) {
        Ok(snapshot) => {
            info!("Game-start endpoint called");
            Ok(Json(ApiResponse::applied(
                "Game started".to_string(),
                snapshot,
            )))
        }
        Err(e) => {
            error!("Failed to start game: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /game/end - discard the game and return to settings
pub async fn game_end_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.end_game() {
        Ok(()) => {
            info!("Game-end endpoint called");
            Ok(Json(ApiResponse::new(
                "applied".to_string(),
                "Game ended".to_string(),
                None,
            )))
        }
        Err(e) => {
            error!("Failed to end game: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /game/reset - refill both clocks of the mounted game
pub async fn game_reset_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    intent_response(state.reset_game(), "Game reset")
}

/// Handle POST /press/upper - the upper player's button
pub async fn upper_press_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    intent_response(state.press(Player::Upper), "Upper button pressed")
}

/// Handle POST /press/lower - the lower player's button
pub async fn lower_press_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    intent_response(state.press(Player::Lower), "Lower button pressed")
}

/// Handle POST /press/pause - the start/pause/resume button
pub async fn pause_press_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    intent_response(state.toggle_pause(), "Pause button pressed")
}

/// Map an intent outcome to the shared response shape
fn intent_response(
    outcome: Result<Option<TimerSnapshot>, String>,
    message: &str,
) -> Result<Json<ApiResponse>, StatusCode> {
    match outcome {
        Ok(Some(snapshot)) => Ok(Json(ApiResponse::applied(message.to_string(), snapshot))),
        Ok(None) => Ok(Json(ApiResponse::ignored(format!(
            "{} with no game in progress",
            message
        )))),
        Err(e) => {
            error!("Failed to apply intent '{}': {}", message, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - return the current session status
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let snapshot = match state.get_snapshot() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to get game snapshot: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        game: snapshot.map(GameView::from),
        time_minutes: state.settings.time_minutes(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
