use ps_server::{AppState, build_router, cleanup_config, logger, store_limits};

use ps_core::{ChannelStore, ShutdownCoordinator, spawn_cleanup_task};

use std::error::Error;

use log::{error, info, warn};
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load and validate configuration
    let config = ps_config::Config::load()?;
    config.validate()?;

    let log_file_path = match config.logging.file {
        Some(ref filename) => {
            let log_dir = ps_config::Config::config_dir()?.join(&config.logging.dir);
            std::fs::create_dir_all(&log_dir)?;
            Some(log_dir.join(filename))
        }
        None => None,
    };

    // Initialize logger (before any other logging)
    logger::initialize(*config.logging.level, log_file_path, config.logging.colored)?;

    info!("Starting ps-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    let store = ChannelStore::new(store_limits(&config.store));
    let shutdown = ShutdownCoordinator::new();

    let mut app_state = AppState::new(&config, store.clone(), shutdown.clone());
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => app_state = app_state.with_prometheus(handle),
        Err(e) => warn!("Prometheus exporter unavailable, /metrics disabled: {}", e),
    }

    let cleanup = spawn_cleanup_task(
        store,
        cleanup_config(&config.store),
        shutdown.subscribe_guard(),
    );

    let app = build_router(app_state);

    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!("Server listening on {}", listener.local_addr()?);

    // Spawn signal handler for graceful shutdown
    let shutdown_for_signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
                shutdown_for_signal.shutdown();
            }
            Err(e) => error!("Failed to listen for SIGINT: {}", e),
        }
    });

    let mut server_guard = shutdown.subscribe_guard();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            server_guard.wait().await;
        })
        .await?;

    if let Err(e) = cleanup.await {
        warn!("Cleanup task ended abnormally: {}", e);
    }
    info!("Graceful shutdown complete");

    Ok(())
}
