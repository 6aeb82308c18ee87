//! Stage Timer - A floating countdown-timer daemon
//!
//! This is the main entry point for the stage-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use stage_timer::{
    api::create_router,
    config::Config,
    services::Notifier,
    state::AppState,
    store::{self, DefaultsSource, FileStore, MemoryStore, SnapshotStore},
    tasks::{cue_player_task, UpdateLoop},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("stage_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting stage-timer v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, tick={}ms, cues={:?}",
          config.host, config.port, config.tick_ms, config.cues);

    let store: Arc<dyn SnapshotStore> = if config.ephemeral {
        info!("Ephemeral mode, nothing will be saved");
        Arc::new(MemoryStore::default())
    } else {
        let dir = config.data_dir();
        info!("Data directory: {}", dir.display());
        Arc::new(FileStore::new(dir))
    };

    let defaults = match &config.defaults {
        Some(path) => DefaultsSource::File(path),
        None => DefaultsSource::Bundled,
    };
    let timers = store::load_timers(store.as_ref(), defaults);
    let settings = store::load_settings(store.as_ref());

    // Start the cue player before anything can notify
    let (notifier, cues) = Notifier::channel(settings.sounds);
    tokio::spawn(cue_player_task(cues, config.cues.build()));

    let state = Arc::new(AppState::new(
        timers,
        settings,
        notifier,
        store,
        config.port,
        config.host.clone(),
    ));

    let mut update_loop = UpdateLoop::new(config.tick_period());
    update_loop.start(Arc::clone(&state));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET    /timers               - Timers with formatted time and color");
    info!("  POST   /timers/:index/toggle - Start exclusively or pause");
    info!("  GET    /snapshot             - Export settings and timers for the editor");
    info!("  PUT    /snapshot             - Import edited settings and timers");
    info!("  POST   /editor/open|close    - Editor session");
    info!("  GET    /status               - Daemon status");

    // Serve until SIGTERM/SIGINT
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {}", e);
    }
    info!("Shutdown signal received, saving state");

    update_loop.stop();
    if !state.persist() {
        tracing::warn!("Timers or settings were not saved on shutdown");
    }

    info!("Server shutdown complete");
    Ok(())
}
