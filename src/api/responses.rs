//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{format_clock, GamePhase, Player, TimerSnapshot};

/// Renderer-ready view of one clock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockView {
    /// Raw remaining seconds, unclamped
    pub remaining_seconds: f64,
    /// Clamped, truncated `MM:SS` display string
    pub display: String,
    /// Whether this side lost on time
    pub flag_fallen: bool,
}

/// Renderer-ready view of the game, sufficient to draw both clocks and
/// label the control buttons
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameView {
    pub phase: GamePhase,
    pub active_player: Option<Player>,
    pub upper: ClockView,
    pub lower: ClockView,
}

impl From<TimerSnapshot> for GameView {
    fn from(snapshot: TimerSnapshot) -> Self {
        let timed_out = snapshot.timed_out();
        Self {
            phase: snapshot.phase,
            active_player: snapshot.active_player,
            upper: ClockView {
                remaining_seconds: snapshot.upper_remaining,
                display: format_clock(snapshot.upper_remaining),
                flag_fallen: timed_out == Some(Player::Upper),
            },
            lower: ClockView {
                remaining_seconds: snapshot.lower_remaining,
                display: format_clock(snapshot.lower_remaining),
                flag_fallen: timed_out == Some(Player::Lower),
            },
        }
    }
}

/// API response structure for intent endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub game: Option<GameView>,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, game: Option<TimerSnapshot>) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            game: game.map(GameView::from),
        }
    }

    /// The intent was applied to a mounted game
    pub fn applied(message: String, game: TimerSnapshot) -> Self {
        Self::new("applied".to_string(), message, Some(game))
    }

    /// The intent arrived with no game mounted and was ignored
    pub fn ignored(message: String) -> Self {
        Self::new("ignored".to_string(), message, None)
    }
}

/// Status response with session metadata alongside the game view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub game: Option<GameView>,
    /// Configured time per player in minutes
    pub time_minutes: u64,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
