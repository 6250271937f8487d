//! HTTP API module
//!
//! The presentation surface: button intents come in as POSTs, snapshots go
//! out on /status.

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
        .route("/game/start", post(game_start_handler))
        .route("/game/end", post(game_end_handler))
        .route("/game/reset", post(game_reset_handler))
        .route("/press/upper", post(upper_press_handler))
        .route("/press/lower", post(lower_press_handler))
        .route("/press/pause", post(pause_press_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
