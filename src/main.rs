use std::sync::Arc;

use anyhow::Context;
use planville_chatbot::{config::AppConfig, error::StartupError, routes, state::AppState};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real deployments set the environment directly.
    let dotenv = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,tower_http=info"))
        .context("invalid log filter")?;
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init()
        .context("failed to install tracing subscriber")?;

    if let Err(e) = dotenv {
        if !e.not_found() {
            warn!(error = %e, ".env file could not be loaded");
        }
    }

    let config = AppConfig::from_env().context("failed to load configuration")?;
    if config.completion.api_key.is_none() {
        warn!("OPENAI_API_KEY not set; completion calls will be rejected by the provider");
    }

    let state = Arc::new(AppState::from_config(&config)?);
    let app = routes::create_router().with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .map_err(|source| StartupError::Bind {
            addr: config.bind_addr.clone(),
            source,
        })?;

    info!(addr = %config.bind_addr, "🚀 Planville chatbot listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl+C.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
