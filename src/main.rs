mod api;
mod config;
mod engine;
mod error;
mod identity;
mod models;
mod observability;
mod state;
mod store;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::engine::lifecycle::LifecycleEngine;
use crate::models::actor::Role;
use crate::store::memory::MemoryStore;

#[tokio::main]
async fn main() -> Result<(), error::AppError> {
    let config = config::Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_level.clone()))
        .with_target(false)
        .compact()
        .init();

    let engine = LifecycleEngine::new(Arc::new(MemoryStore::new()));
    let app_state = Arc::new(state::AppState::new(engine));

    match &config.admin_token {
        Some(token) => {
            let admin = app_state.identity.seed(token, "admin", Role::Admin);
            tracing::info!(admin_id = %admin.id, "admin account seeded");
        }
        None => {
            tracing::warn!("ADMIN_TOKEN not set, no admin account seeded");
        }
    }

    let app = api::rest::router(app_state);

    let bind_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|err| error::AppError::Internal(format!("failed to bind {bind_addr}: {err}")))?;

    tracing::info!(http_port = config.http_port, "http server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| error::AppError::Internal(format!("server error: {err}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
