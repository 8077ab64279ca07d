use anyhow::Context;
use expense_api::config::config;
use expense_api::database::DatabaseManager;
use expense_api::{app, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,expense_api=debug")),
        )
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config().clone();
    tracing::info!(
        "Starting Expense API in {:?} mode with {:?} store",
        config.environment,
        config.store.backend
    );

    if config.security.jwt_secret.is_empty() {
        tracing::warn!("JWT_SECRET is not set; authenticated routes will fail");
    }

    let store = DatabaseManager::open(&config)
        .await
        .context("failed to open expense store")?;

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Expense API listening on http://{}", bind_addr);

    axum::serve(listener, app(AppState::new(config, store)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Expense API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
