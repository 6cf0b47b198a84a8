//! PDF render service - HTML to PDF over HTTP
//!
//! Accepts raw HTML on POST /api/v1/generate, renders it with wkhtmltopdf,
//! and evicts the temporary artifacts after the retention window.

use pdf_render_service::{
    start_server, RenderService, Result, ServerState, ServiceConfig, ServiceError, SharedState,
    WkhtmltopdfRunner,
};
use render_cache::{ArtifactStore, CacheRegistry, EvictionLoop};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let env_filter = EnvFilter::from_default_env()
        .add_directive("pdf_render_service=info".parse()?)
        .add_directive("render_cache=info".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    info!("Starting PDF render service...");

    let config = ServiceConfig::from_env();
    info!("Port: {}", config.port);
    info!("Cache dir: {:?}", config.cache_dir);
    info!("Renderer: {:?}", config.renderer_path);
    info!(
        "Cache retention: {}s, sweep interval: {}s",
        config.retention.as_secs(),
        config.sweep_interval.as_secs()
    );
    match config.render_timeout {
        Some(limit) => info!("Render timeout: {}s", limit.as_secs()),
        None => warn!("Render timeout disabled"),
    }

    let store = ArtifactStore::new(&config.cache_dir);
    store.init().await?;
    let registry = Arc::new(CacheRegistry::new());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let eviction = EvictionLoop::new(store.clone(), Arc::clone(&registry), config.eviction())
        .spawn(shutdown_rx);

    let runner = Arc::new(WkhtmltopdfRunner::new(
        &config.renderer_path,
        config.render_timeout,
    ));
    let renderer = RenderService::new(store, registry, runner);
    let state: SharedState = Arc::new(ServerState::new(renderer));

    // Serve until a shutdown signal arrives
    let served = start_server(state, config.port, config.max_body_bytes, shutdown_signal()).await;

    // Stop the eviction loop between sweeps
    let _ = shutdown_tx.send(true);
    if let Err(e) = eviction.await {
        warn!("Eviction loop ended abnormally: {}", e);
    }

    served.map_err(|e| ServiceError::Config(format!("Server error: {}", e)))?;
    info!("PDF render service stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
