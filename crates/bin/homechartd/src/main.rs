//! # homechartd: homechart daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialise logging
//! - Initialise the `SQLite` connection pool and run migrations
//! - Construct repository implementations (adapters)
//! - Construct application services, injecting repositories via port traits
//! - Build the axum router, injecting application services
//! - Bind to a TCP port and serve, exposing peer addresses to handlers
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use homechart_adapter_http_axum::router;
use homechart_adapter_http_axum::state::AppState;
use homechart_adapter_storage_sqlite_sqlx::{
    Config as StorageConfig, SqliteReadingRepository, SqliteSessionStore,
};
use homechart_app::access::{AccessPolicy, AccessService};
use homechart_app::services::chart_service::ChartService;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Database
    let db = StorageConfig {
        database_url: config.database_url().to_owned(),
    }
    .build()
    .await
    .context("failed to open database")?;
    let pool = db.pool().clone();

    // Repositories
    let reading_repo = SqliteReadingRepository::new(pool.clone());
    let session_store = SqliteSessionStore::new(pool);

    let purged = session_store
        .purge_expired()
        .await
        .context("failed to purge expired sessions")?;
    tracing::info!(purged, "purged expired sessions");

    // Services
    let policy = AccessPolicy::new(config.access.trusted_ips.iter().copied());
    tracing::info!(trusted = ?policy.trusted(), "caller access policy");
    let chart_service = ChartService::new(reading_repo);
    let access_service = AccessService::new(policy, session_store);

    // HTTP
    let state = AppState::new(chart_service, access_service);
    let app = router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(%bind_addr, "homechartd listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("homechartd stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
