// ABOUTME: Server wiring for the todoinfo binary
// ABOUTME: Opens the database, layers the router and serves until Ctrl-C

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info};

use todoinfo_api::{create_router, AppState};
use todoinfo_storage::{connect, TodoStorage};

pub mod config;


use config::Config;

/// Upper bound on handling a single request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// API router with request tracing and the request timeout applied
pub fn build_app(state: AppState) -> Router {
    create_router(state)
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http())
}

pub async fn run_server(config: Config) -> anyhow::Result<()> {
    config.validate()?;

    let pool = connect(&config.to_pool_config())
        .await
        .with_context(|| format!("failed to open database at {}", config.db_dsn))?;

    let todos = TodoStorage::new(pool);
    todos
        .ensure_schema()
        .await
        .context("failed to prepare todo table")?;

    let app = build_app(AppState::new(todos, config.environment.as_str()));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!(addr = %addr, env = %config.environment, "Starting server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!("Failed to install Ctrl-C handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
