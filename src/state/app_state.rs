//! Game session state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::settings::SettingsStore;

use super::{Player, TimerSnapshot, TurnTimer, DEFAULT_TIME_MINUTES};

/// Session state: the mounted game, the persisted settings, and metadata
///
/// Owns at most one live [`TurnTimer`], constructed on game start and
/// discarded on game end. Every mutation goes through the mutex, so button
/// intents and clock ticks are strictly serialized, and every mutation
/// publishes a fresh snapshot for push-style renderers.
#[derive(Debug)]
pub struct AppState {
    /// The game in progress, if any
    pub game: Arc<Mutex<Option<TurnTimer>>>,
    /// Persisted time-per-player setting
    pub settings: SettingsStore,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last intent tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel carrying the snapshot published after every mutation
    pub snapshot_tx: watch::Sender<Option<TimerSnapshot>>,
    /// Keep the receiver alive to prevent channel closure
    pub _snapshot_rx: watch::Receiver<Option<TimerSnapshot>>,
}

impl AppState {
    /// Create a session with no game mounted
    pub fn new(port: u16, host: String, settings: SettingsStore) -> Self {
        let (snapshot_tx, snapshot_rx) = watch::channel(None);

        Self {
            game: Arc::new(Mutex::new(None)),
            settings,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
        }
    }

    /// Record the latest intent for the status surface
    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Publish a snapshot to watchers
    fn publish(&self, snapshot: Option<TimerSnapshot>) {
        if let Err(e) = self.snapshot_tx.send(snapshot) {
            warn!("Failed to publish snapshot: {}", e);
        }
    }

    /// Apply a transition to the mounted game, if any, and publish the result
    ///
    /// Intents arriving with no game mounted are ignored, mirroring the
    /// core's treatment of illegal transitions.
    fn with_game<F>(&self, action: &str, f: F) -> Result<Option<TimerSnapshot>, String>
    where
        F: FnOnce(&mut TurnTimer),
    {
        let mut game = self
            .game
            .lock()
            .map_err(|e| format!("Failed to lock game state: {}", e))?;

        let Some(timer) = game.as_mut() else {
            info!("Ignoring '{}' intent: no game in progress", action);
            return Ok(None);
        };

        f(timer);
        let snapshot = timer.snapshot();
        drop(game);

        self.record_action(action);
        self.publish(Some(snapshot.clone()));
        Ok(Some(snapshot))
    }

    /// Configure and mount a new game, replacing any game in progress
    ///
    /// An invalid requested time falls back to the default allotment instead
    /// of failing; whatever value is actually used is persisted.
    pub fn start_game(&self, requested_minutes: u64) -> Result<TimerSnapshot, String> {
        let timer = match TurnTimer::new(requested_minutes) {
            Ok(timer) => timer,
            Err(e) => {
                warn!(
                    "Rejected game configuration ({}), falling back to {} minutes",
                    e, DEFAULT_TIME_MINUTES
                );
                TurnTimer::new(DEFAULT_TIME_MINUTES).map_err(|e| e.to_string())?
            }
        };

        if let Err(e) = self.settings.set_time_minutes(timer.time_minutes()) {
            warn!("Failed to persist settings: {}", e);
        }

        let snapshot = timer.snapshot();
        {
            let mut game = self
                .game
                .lock()
                .map_err(|e| format!("Failed to lock game state: {}", e))?;
            *game = Some(timer);
        }

        info!(
            "Game started: {} per player",
            super::format_clock(snapshot.upper_remaining)
        );
        self.record_action("game-start");
        self.publish(Some(snapshot.clone()));
        Ok(snapshot)
    }

    /// Discard the game in progress and return to settings
    pub fn end_game(&self) -> Result<(), String> {
        let mut game = self
            .game
            .lock()
            .map_err(|e| format!("Failed to lock game state: {}", e))?;
        let had_game = game.take().is_some();
        drop(game);

        if had_game {
            info!("Game ended, returning to settings");
        } else {
            info!("Ignoring 'game-end' intent: no game in progress");
        }
        self.record_action("game-end");
        self.publish(None);
        Ok(())
    }

    /// Abandon the game in progress but keep it mounted with full clocks
    pub fn reset_game(&self) -> Result<Option<TimerSnapshot>, String> {
        self.with_game("game-reset", |timer| timer.reset())
    }

    /// Forward a player's button press
    pub fn press(&self, player: Player) -> Result<Option<TimerSnapshot>, String> {
        let action = match player {
            Player::Upper => "press-upper",
            Player::Lower => "press-lower",
        };
        self.with_game(action, |timer| timer.press(player, Instant::now()))
    }

    /// Forward the start/pause/resume button press
    pub fn toggle_pause(&self) -> Result<Option<TimerSnapshot>, String> {
        self.with_game("press-pause", |timer| timer.toggle_pause(Instant::now()))
    }

    /// Advance the mounted game's clock; a no-op while no game is mounted
    pub fn tick(&self, now: Instant) -> Result<(), String> {
        let mut game = self
            .game
            .lock()
            .map_err(|e| format!("Failed to lock game state: {}", e))?;

        let Some(timer) = game.as_mut() else {
            return Ok(());
        };

        timer.tick(now);
        let snapshot = timer.snapshot();
        drop(game);

        self.publish(Some(snapshot));
        Ok(())
    }

    /// Current snapshot of the mounted game, if any
    pub fn get_snapshot(&self) -> Result<Option<TimerSnapshot>, String> {
        self.game
            .lock()
            .map(|game| game.as_ref().map(|timer| timer.snapshot()))
            .map_err(|e| format!("Failed to lock game state: {}", e))
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last intent information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
