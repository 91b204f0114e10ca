//! Job-status HTTP server backed by the in-memory store.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

use rsources::cleanup::run_cleanup_loop;
use rsources::config::Settings;
use rsources::http::{router, AppState};
use rsources::memory::MemoryJobService;
use rsources::observability::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load().context("failed to load settings")?;
    init_tracing(&settings.log).context("failed to initialize logging")?;

    let store = Arc::new(MemoryJobService::new());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweep = tokio::spawn(run_cleanup_loop(
        store.clone(),
        settings.retention(),
        settings.cleanup_interval(),
        shutdown_rx,
    ));

    let state = AppState::new(store).with_request_timeout(settings.request_timeout());
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(settings.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.listen_addr))?;
    info!(addr = %settings.listen_addr, "Job status server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %err, "Failed to listen for shutdown signal");
            }
            info!("Shutdown requested");
        })
        .await
        .context("job status server error")?;

    // Errors only if the sweep already exited.
    let _ = shutdown_tx.send(true);
    sweep.await.context("retention sweep panicked")?;
    info!("Job status server stopped");
    Ok(())
}
