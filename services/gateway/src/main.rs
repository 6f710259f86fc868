//! Trusted intermediary between players and the model provider.
//!
//! Holds the long-lived API key, mints ephemeral realtime sessions, proxies
//! text generation and speech synthesis, extracts PDF text, and keeps the
//! saved-episode history.

mod config;
mod history;
mod openai;
mod pdf;
mod routes;

use std::sync::Arc;

use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::GatewayConfig;
use history::HistoryStore;
use openai::OpenAiClient;
use routes::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = GatewayConfig::from_env()?;

    let state = Arc::new(AppState {
        openai: OpenAiClient::new(&config),
        history: HistoryStore::open(&config.history_db)?,
    });

    // Permissive CORS so a locally served frontend can reach the API.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::router(state).layer(cors);

    info!("Starting gateway, listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
