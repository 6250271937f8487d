//! State management module
//!
//! This module contains the turn clock state machine and the session state
//! that owns it.

pub mod app_state;
pub mod turn_timer;

// Re-export main types
pub use app_state::AppState;
pub use turn_timer::{
    format_clock, GamePhase, Player, TimerError, TimerSnapshot, TurnTimer, DEFAULT_TIME_MINUTES,
};
