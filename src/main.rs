//! Tickdown - a state-managed countdown timer service
//!
//! This is the main entry point for the tickdown daemon.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use tickdown::{
    api::create_router,
    config::Config,
    engine::{self, AttachmentManager},
    recovery::JsonFileStore,
    state::{AppState, RecoveryOutcome},
    tasks::tick_display_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("tickdown={},tower_http=info", config.log_level()))
        .init();

    info!("Starting tickdown v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, initial={}s, store={}",
        config.host,
        config.port,
        config.initial,
        config.store_path.display()
    );

    // The engine outlives every observer; it is built once per process and
    // torn down only at process exit
    let attachments = Arc::new(AttachmentManager::new());
    let engine = engine::spawn(Arc::clone(&attachments));
    let store = Arc::new(JsonFileStore::new(config.store_path.clone()));
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.initial,
        engine,
        attachments,
        store,
    ));

    // Attach the in-process observer, then decide from the recovery snapshot
    // whether to resume a paused run or start fresh
    let attachment = state.attach();
    match state.recover_on_attach() {
        Ok(RecoveryOutcome::Resumed { remaining }) => {
            info!("Recovered paused countdown at {}s, waiting for resume", remaining);
        }
        Ok(RecoveryOutcome::Fresh { initial }) => {
            info!("Fresh countdown started from {}s", initial);
        }
        Err(e) => {
            tracing::error!("Failed to initialize countdown: {}", e);
            std::process::exit(1);
        }
    }
    tokio::spawn(tick_display_task(attachment));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start   - Start a countdown (optional JSON body {{\"initial\": n}})");
    info!("  POST /toggle  - Pause or resume the countdown");
    info!("  GET  /status  - Current countdown state and server status");
    info!("  GET  /health  - Health check");

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
