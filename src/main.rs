use crate::config::ServiceConfig;
use crate::database::UserRepository;
use anyhow::Context;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

mod config;
mod database;
mod db;
mod domain;
mod features;

#[cfg(test)]
mod tests;

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn UserRepository>,
}

/// Composes the feature routers and the request tracing layer.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(features::users::users_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // determine environment variables
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ServiceConfig::from_env().context("Failed to load configuration")?;

    tracing::info!("Connecting to {}", config.database);
    let repo = db::connect(&config).await?;

    // refuse to serve requests against a table that was never created
    repo.ensure_schema()
        .await
        .context("Failed to create users table")?;
    tracing::info!("Users table created or already exists");

    let app = build_app(AppState { repo });

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!("Server listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
