//! Two-player turn clock state machine

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Default time per player in minutes, used when no valid value is configured
pub const DEFAULT_TIME_MINUTES: u64 = 15;

/// The two seats at the board, named for a face-to-face layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Upper,
    Lower,
}

impl Player {
    /// The seat across the board
    pub fn opponent(self) -> Self {
        match self {
            Player::Upper => Player::Lower,
            Player::Lower => Player::Upper,
        }
    }
}

/// Game phase - exactly one holds at any instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Clocks are full, nothing runs yet
    WaitingForStart,
    /// Setup has begun, whichever player presses first takes the first turn
    ChoosingFirstPlayer,
    /// One clock is counting down
    ActiveTurn,
    /// Frozen, either by the pause button or by a clock reaching zero
    Paused,
}

/// Construction error for the turn clock
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// The configured time per player was not a positive number of minutes
    #[error("time per player must be a positive number of minutes, got {0}")]
    InvalidConfig(u64),
}

/// Read-only view of the clock state, published after every mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: GamePhase,
    pub active_player: Option<Player>,
    /// Raw remaining seconds; may be fractional and transiently negative
    pub upper_remaining: f64,
    pub lower_remaining: f64,
}

impl TimerSnapshot {
    /// Which player, if any, has exhausted their clock
    pub fn timed_out(&self) -> Option<Player> {
        if self.phase != GamePhase::Paused {
            return None;
        }
        if self.upper_remaining <= 0.0 {
            Some(Player::Upper)
        } else if self.lower_remaining <= 0.0 {
            Some(Player::Lower)
        } else {
            None
        }
    }
}

/// Countdown clock pair for one game session
///
/// All transitions are total: a call that is not legal in the current phase
/// is a silent no-op, so the surface forwarding button presses never has to
/// pre-validate. Time is only ever deducted inside [`TurnTimer::tick`].
/// Operations that start a measurement take the current instant as a
/// parameter; callers are expected to pass a monotonic `Instant::now()`.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnTimer {
    total_seconds: f64,
    upper_remaining: f64,
    lower_remaining: f64,
    phase: GamePhase,
    active_player: Option<Player>,
    last_tick: Option<Instant>,
}

impl TurnTimer {
    /// Create a clock pair with `time_minutes` per player
    pub fn new(time_minutes: u64) -> Result<Self, TimerError> {
        if time_minutes == 0 {
            return Err(TimerError::InvalidConfig(time_minutes));
        }
        let total_seconds = (time_minutes * 60) as f64;
        Ok(Self {
            total_seconds,
            upper_remaining: total_seconds,
            lower_remaining: total_seconds,
            phase: GamePhase::WaitingForStart,
            active_player: None,
            last_tick: None,
        })
    }

    /// Begin setup: the next player button press takes the first turn
    pub fn begin_first_player_selection(&mut self) {
        if self.phase == GamePhase::WaitingForStart {
            self.phase = GamePhase::ChoosingFirstPlayer;
        }
    }

    /// Give the first turn to `player` and start their clock
    pub fn select_first_player(&mut self, player: Player, now: Instant) {
        if self.phase == GamePhase::ChoosingFirstPlayer {
            self.active_player = Some(player);
            self.phase = GamePhase::ActiveTurn;
            self.last_tick = Some(now);
        }
    }

    /// `player` signals their move is done; the opponent's clock starts
    ///
    /// Only the active player can end a turn. The waiting player's button,
    /// or any press outside an active turn, does nothing.
    pub fn end_turn(&mut self, player: Player, now: Instant) {
        if self.phase == GamePhase::ActiveTurn && self.active_player == Some(player) {
            self.active_player = Some(player.opponent());
            self.last_tick = Some(now);
        }
    }

    /// What a player's own button means in the current phase
    pub fn press(&mut self, player: Player, now: Instant) {
        match self.phase {
            GamePhase::ChoosingFirstPlayer => self.select_first_player(player, now),
            GamePhase::ActiveTurn => self.end_turn(player, now),
            GamePhase::WaitingForStart | GamePhase::Paused => {}
        }
    }

    /// The start/pause/resume button
    ///
    /// From `WaitingForStart` this begins first-player selection. Pausing
    /// keeps the active player so the display can label the frozen side;
    /// resuming re-stamps the measurement baseline so the paused interval is
    /// never charged. A game that ended by time-out has no active player
    /// left and cannot be resumed.
    pub fn toggle_pause(&mut self, now: Instant) {
        match self.phase {
            GamePhase::WaitingForStart => self.begin_first_player_selection(),
            GamePhase::ActiveTurn => {
                self.phase = GamePhase::Paused;
                self.last_tick = None;
            }
            GamePhase::Paused => {
                if self.active_player.is_some() {
                    self.phase = GamePhase::ActiveTurn;
                    self.last_tick = Some(now);
                }
            }
            GamePhase::ChoosingFirstPlayer => {}
        }
    }

    /// Advance the active clock; the only place time is deducted
    ///
    /// Safe to call on a fixed interval regardless of phase. The first call
    /// after entering an active turn only establishes the baseline, so a
    /// stalled caller cannot charge its stall as game time. Non-monotonic
    /// samples charge nothing.
    pub fn tick(&mut self, now: Instant) {
        if self.phase != GamePhase::ActiveTurn {
            self.last_tick = None;
            return;
        }
        let Some(last) = self.last_tick else {
            self.last_tick = Some(now);
            return;
        };
        let elapsed = now.saturating_duration_since(last).as_secs_f64();
        self.last_tick = Some(now);

        match self.active_player {
            Some(Player::Upper) => self.upper_remaining -= elapsed,
            Some(Player::Lower) => self.lower_remaining -= elapsed,
            None => {}
        }

        // Reaching exactly zero counts as a time-out. The stored values stay
        // unclamped; the display layer clamps for presentation.
        if self.upper_remaining <= 0.0 || self.lower_remaining <= 0.0 {
            self.phase = GamePhase::Paused;
            self.active_player = None;
            self.last_tick = None;
        }
    }

    /// Abandon the game in progress and refill both clocks
    pub fn reset(&mut self) {
        self.upper_remaining = self.total_seconds;
        self.lower_remaining = self.total_seconds;
        self.phase = GamePhase::WaitingForStart;
        self.active_player = None;
        self.last_tick = None;
    }

    /// Current read-only view
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.phase,
            active_player: self.active_player,
            upper_remaining: self.upper_remaining,
            lower_remaining: self.lower_remaining,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn active_player(&self) -> Option<Player> {
        self.active_player
    }

    pub fn upper_remaining(&self) -> f64 {
        self.upper_remaining
    }

    pub fn lower_remaining(&self) -> f64 {
        self.lower_remaining
    }

    /// Per-player allotment in whole minutes
    pub fn time_minutes(&self) -> u64 {
        self.total_seconds as u64 / 60
    }
}

/// Format remaining seconds as `MM:SS` for display
///
/// Negative values clamp to zero and fractions truncate; minutes have no
/// upper bound, so a two-hour clock reads `120:00`.
pub fn format_clock(seconds: f64) -> String {
    let secs = seconds.max(0.0) as u64;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn at(base: Instant, secs: u64) -> Instant {
        base + Duration::from_secs(secs)
    }

    /// Drive a fresh one-minute game into an active upper turn
    fn active_upper(base: Instant) -> TurnTimer {
        let mut timer = TurnTimer::new(1).unwrap();
        timer.toggle_pause(base);
        timer.select_first_player(Player::Upper, base);
        timer
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn new_game_has_full_clocks() {
        let timer = TurnTimer::new(15).unwrap();
        assert_eq!(timer.upper_remaining(), 900.0);
        assert_eq!(timer.lower_remaining(), 900.0);
        assert_eq!(timer.phase(), GamePhase::WaitingForStart);
        assert_eq!(timer.active_player(), None);
    }

    #[test]
    fn zero_minutes_is_rejected() {
        assert_eq!(TurnTimer::new(0), Err(TimerError::InvalidConfig(0)));
    }

    #[test]
    fn tick_outside_active_turn_charges_nothing() {
        let base = Instant::now();
        let mut timer = TurnTimer::new(15).unwrap();

        timer.tick(base);
        timer.tick(at(base, 3600));
        assert_eq!(timer.upper_remaining(), 900.0);
        assert_eq!(timer.lower_remaining(), 900.0);

        timer.begin_first_player_selection();
        timer.tick(at(base, 7200));
        assert_eq!(timer.upper_remaining(), 900.0);
        assert_eq!(timer.lower_remaining(), 900.0);
    }

    #[test]
    fn elapsed_time_is_charged_to_the_active_player_only() {
        let base = Instant::now();
        let mut timer = active_upper(base);

        timer.tick(at(base, 10));
        assert_close(timer.upper_remaining(), 50.0);
        assert_eq!(timer.lower_remaining(), 60.0);

        timer.tick(at(base, 25));
        assert_close(timer.upper_remaining(), 35.0);
        assert_eq!(timer.lower_remaining(), 60.0);
    }

    #[test]
    fn ending_a_turn_hands_the_clock_to_the_opponent() {
        let base = Instant::now();
        let mut timer = active_upper(base);

        timer.tick(at(base, 5));
        timer.end_turn(Player::Upper, at(base, 5));
        assert_eq!(timer.active_player(), Some(Player::Lower));

        timer.tick(at(base, 12));
        assert_close(timer.upper_remaining(), 55.0);
        assert_close(timer.lower_remaining(), 53.0);
    }

    #[test]
    fn the_waiting_player_cannot_end_the_turn() {
        let base = Instant::now();
        let mut timer = active_upper(base);

        timer.end_turn(Player::Lower, at(base, 5));
        assert_eq!(timer.active_player(), Some(Player::Upper));
        assert_eq!(timer.phase(), GamePhase::ActiveTurn);
    }

    #[test]
    fn press_selects_then_ends_turns() {
        let base = Instant::now();
        let mut timer = TurnTimer::new(1).unwrap();

        // Before setup the buttons are dead
        timer.press(Player::Upper, base);
        assert_eq!(timer.phase(), GamePhase::WaitingForStart);

        timer.toggle_pause(base);
        timer.press(Player::Lower, base);
        assert_eq!(timer.phase(), GamePhase::ActiveTurn);
        assert_eq!(timer.active_player(), Some(Player::Lower));

        // The waiting player's press does nothing
        timer.press(Player::Upper, at(base, 2));
        assert_eq!(timer.active_player(), Some(Player::Lower));

        // The active player's press ends their turn
        timer.press(Player::Lower, at(base, 4));
        assert_eq!(timer.active_player(), Some(Player::Upper));
    }

    #[test]
    fn pausing_freezes_both_clocks_and_keeps_the_active_player() {
        let base = Instant::now();
        let mut timer = active_upper(base);

        timer.tick(at(base, 10));
        timer.toggle_pause(at(base, 10));
        assert_eq!(timer.phase(), GamePhase::Paused);
        assert_eq!(timer.active_player(), Some(Player::Upper));

        // A long stall while paused is not charged
        timer.tick(at(base, 3610));
        assert_close(timer.upper_remaining(), 50.0);
        assert_eq!(timer.lower_remaining(), 60.0);

        // Resuming re-stamps the baseline, so only post-resume time counts
        timer.toggle_pause(at(base, 3620));
        assert_eq!(timer.phase(), GamePhase::ActiveTurn);
        timer.tick(at(base, 3625));
        assert_close(timer.upper_remaining(), 45.0);
    }

    #[test]
    fn pause_button_is_dead_while_choosing_the_first_player() {
        let base = Instant::now();
        let mut timer = TurnTimer::new(1).unwrap();
        timer.toggle_pause(base);
        assert_eq!(timer.phase(), GamePhase::ChoosingFirstPlayer);

        timer.toggle_pause(at(base, 1));
        assert_eq!(timer.phase(), GamePhase::ChoosingFirstPlayer);
    }

    #[test]
    fn running_out_of_time_ends_the_game() {
        let base = Instant::now();
        let mut timer = active_upper(base);

        timer.tick(at(base, 61));
        assert!(timer.upper_remaining() <= 0.0);
        assert_eq!(timer.phase(), GamePhase::Paused);
        assert_eq!(timer.active_player(), None);

        // Terminal: further ticks change nothing
        timer.tick(at(base, 120));
        assert_close(timer.upper_remaining(), -1.0);
        assert_eq!(timer.lower_remaining(), 60.0);

        // and the pause button cannot revive the game
        timer.toggle_pause(at(base, 130));
        assert_eq!(timer.phase(), GamePhase::Paused);
        timer.press(Player::Upper, at(base, 131));
        assert_eq!(timer.phase(), GamePhase::Paused);
    }

    #[test]
    fn reaching_exactly_zero_counts_as_a_time_out() {
        let base = Instant::now();
        let mut timer = active_upper(base);

        timer.tick(at(base, 60));
        assert_eq!(timer.upper_remaining(), 0.0);
        assert_eq!(timer.phase(), GamePhase::Paused);
        assert_eq!(timer.active_player(), None);
    }

    #[test]
    fn non_monotonic_samples_charge_nothing() {
        let base = Instant::now();
        let mut timer = active_upper(base);

        timer.tick(at(base, 10));
        timer.tick(at(base, 4));
        assert_close(timer.upper_remaining(), 50.0);

        // and accounting continues cleanly from the rewound sample
        timer.tick(at(base, 9));
        assert_close(timer.upper_remaining(), 45.0);
    }

    #[test]
    fn reset_refills_both_clocks() {
        let base = Instant::now();
        let mut timer = active_upper(base);
        timer.tick(at(base, 20));
        timer.reset();

        assert_eq!(timer.phase(), GamePhase::WaitingForStart);
        assert_eq!(timer.active_player(), None);
        assert_eq!(timer.upper_remaining(), 60.0);
        assert_eq!(timer.lower_remaining(), 60.0);
    }

    #[test]
    fn snapshot_reports_the_timed_out_player() {
        let base = Instant::now();
        let mut timer = active_upper(base);
        assert_eq!(timer.snapshot().timed_out(), None);

        timer.toggle_pause(at(base, 1));
        assert_eq!(timer.snapshot().timed_out(), None);
        timer.toggle_pause(at(base, 2));

        timer.tick(at(base, 70));
        assert_eq!(timer.snapshot().timed_out(), Some(Player::Upper));
    }

    #[test]
    fn full_game_scenario() {
        let base = Instant::now();
        let mut timer = TurnTimer::new(1).unwrap();

        timer.toggle_pause(base);
        assert_eq!(timer.phase(), GamePhase::ChoosingFirstPlayer);

        timer.select_first_player(Player::Upper, base);
        assert_eq!(timer.phase(), GamePhase::ActiveTurn);
        assert_eq!(timer.active_player(), Some(Player::Upper));

        // Baseline tick charges nothing
        timer.tick(base);
        assert_eq!(timer.upper_remaining(), 60.0);
        assert_eq!(timer.lower_remaining(), 60.0);

        timer.tick(at(base, 30));
        assert_close(timer.upper_remaining(), 30.0);
        assert_eq!(timer.lower_remaining(), 60.0);

        timer.end_turn(Player::Upper, at(base, 30));
        timer.tick(at(base, 75));
        assert_close(timer.lower_remaining(), 15.0);

        timer.tick(at(base, 95));
        assert!(timer.lower_remaining() <= 0.0);
        assert_eq!(timer.phase(), GamePhase::Paused);
        assert_eq!(timer.active_player(), None);
    }

    #[test]
    fn clock_formatting() {
        assert_eq!(format_clock(-5.0), "00:00");
        assert_eq!(format_clock(0.0), "00:00");
        assert_eq!(format_clock(65.0), "01:05");
        assert_eq!(format_clock(89.9), "01:29");
        assert_eq!(format_clock(3599.0), "59:59");
        assert_eq!(format_clock(3600.0), "60:00");
        assert_eq!(format_clock(7200.0), "120:00");
    }
}
