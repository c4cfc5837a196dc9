use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use cooklyst_api_rust::app::{app, AppState, RouterOptions};
use cooklyst_api_rust::config;
use cooklyst_api_rust::database::{DatabaseManager, PgContentRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SOAP_KEY, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    config.validate().context("invalid configuration")?;
    tracing::info!("Starting Cooklyst API in {:?} mode", config.environment);

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    let repository = Arc::new(PgContentRepository::new(pool));

    let state = AppState::from_config(config, repository).context("failed to build subscription client")?;
    let router = app(state, &RouterOptions::from_config(config));

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Cooklyst API listening on http://{}", bind_addr);

    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
