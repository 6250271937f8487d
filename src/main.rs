//! Game Clock - a state-managed HTTP server for a two-player game clock
//!
//! This is the main entry point for the game-clock application.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use game_clock::{
    api::create_router, config::Config, settings::SettingsStore, state::AppState,
    tasks::clock_tick_task, utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("game_clock={},tower_http=info", config.log_level()))
        .init();

    info!("Starting game-clock server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, settings_file={}",
        config.host,
        config.port,
        config.settings_file.display()
    );

    // Load the persisted settings and create the session state
    let settings = SettingsStore::open(config.settings_file.clone());
    let state = Arc::new(AppState::new(config.port, config.host.clone(), settings));

    // Start the clock tick background task
    let tick_state = Arc::clone(&state);
    tokio::spawn(async move {
        clock_tick_task(tick_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /game/start  - Configure and start a new game");
    info!("  POST /game/end    - End the game and return to settings");
    info!("  POST /game/reset  - Refill both clocks");
    info!("  POST /press/upper - Upper player's button");
    info!("  POST /press/lower - Lower player's button");
    info!("  POST /press/pause - Start/pause/resume button");
    info!("  GET  /status      - Current game snapshot and session status");
    info!("  GET  /health      - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
