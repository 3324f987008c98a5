mod config;
mod handlers;
mod models;
mod services;
mod state;
mod types;
mod utils;

use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cp_lite=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from_env()?;

    let lifecycle = CancellationToken::new();
    let state = state::init(&config, lifecycle.clone())?;
    let app = handlers::router(state);

    let shutdown = lifecycle.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
            return;
        }
        tracing::info!("Shutting down");
        shutdown.cancel();
    });

    let addr = SocketAddr::new(config.bind_addr, config.port);
    tracing::info!("Starting control plane on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { lifecycle.cancelled().await })
        .await?;

    Ok(())
}
