//! Periodic clock tick background task

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::time::interval;
use tracing::{error, info};

use crate::state::AppState;

/// How often the active clock is advanced
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Background task that drives the mounted game's clock
///
/// Runs for the life of the process and fires regardless of game state; the
/// session state decides whether a tick means anything. Elapsed time is
/// measured from the monotonic instants passed in here, not from the
/// interval cadence, so a delayed wakeup never loses or invents time.
pub async fn clock_tick_task(state: Arc<AppState>) {
    info!(
        "Starting clock tick task at {}ms intervals",
        TICK_INTERVAL.as_millis()
    );

    let mut interval = interval(TICK_INTERVAL);

    loop {
        interval.tick().await;

        if let Err(e) = state.tick(Instant::now()) {
            error!("Clock tick failed: {}", e);
        }
    }
}
