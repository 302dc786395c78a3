//! Ephemeral Relay - Binary Entry Point
//!
//! Reads configuration from the environment, then serves the relay until
//! Ctrl+C.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use ephemeral_relay::api::{create_router, AppState};
use ephemeral_relay::{AppResult, EventWindow, RelayConfig, NAME, VERSION};

#[tokio::main]
async fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ephemeral_relay=info")),
        )
        .init();

    let config = RelayConfig::from_env()?;

    let window = Arc::new(EventWindow::new(config.capacity));
    let state = Arc::new(AppState::new(window, &config));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(
        name = NAME,
        version = VERSION,
        addr = %config.listen_addr,
        capacity = config.capacity.get(),
        "relay listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
