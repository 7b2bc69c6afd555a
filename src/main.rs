//! Secure Audience Manager API
//!
//! Dashboard back-end over a data-warehouse session: browse warehouse
//! metadata, run match overlaps and define custom audiences. Scoring and
//! audience materialization live in warehouse procedures; this service
//! marshals parameters to them and renders what comes back.

mod audience;
mod config;
mod db;
mod error;
mod introspection;
mod match_rate;
mod models;
mod page;
mod routes;
mod session;
mod state;

use crate::config::Settings;
use crate::db::PgSessionFactory;
use crate::routes::create_router;
use crate::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber for structured logging
    init_tracing();

    info!("Starting Secure Audience Manager...");

    // Load configuration
    let settings = Settings::load()?;
    info!("Configuration loaded successfully");

    // Warehouse pool; sessions are checked out per request
    let pool = db::create_pool(&settings.warehouse)?;
    let sessions = PgSessionFactory::new(pool);
    sessions.verify().await?;
    info!(
        "Warehouse pool ready ({}:{}, TLS: {})",
        settings.warehouse.host, settings.warehouse.port, settings.warehouse.use_tls
    );

    let state = Arc::new(AppState::new(Arc::new(sessions), settings.audience.clone()));

    // Build the router
    let app = create_router(state, &settings);

    let addr = SocketAddr::from((settings.server.host, settings.server.port));

    info!("Server listening on http://{}", addr);
    info!("API Endpoints:");
    info!("   POST /api/page                  - Render page for current selections");
    info!("   GET  /api/metadata/databases    - List databases");
    info!("   GET  /api/metadata/schemas      - List schemas of a database");
    info!("   GET  /api/metadata/tables       - List tables of a schema");
    info!("   GET  /api/metadata/columns      - List columns of a table");
    info!("   POST /api/match-rate            - Run match overlap");
    info!("   GET  /api/audiences             - List created audiences");
    info!("   POST /api/audiences             - Create custom audience");
    info!("   GET  /api/audiences/standard    - Standard audiences");

    // Create TCP listener and serve
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing with structured logging
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,audience_manager=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        },
    }
}
