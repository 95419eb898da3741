//! fundlens-api - Report data HTTP service
//!
//! Serves the donation report aggregates (think tank and donor breakdowns,
//! archives, top-10) to the interactive front-end tables. Read-only.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;

use fundlens_api::{build_router, AppState};
use fundlens_common::config::{resolve_database_path, DB_ENV_VAR};
use fundlens_common::db;

/// Command-line arguments for fundlens-api
#[derive(Parser, Debug)]
#[command(name = "fundlens-api")]
#[command(about = "Donation report data service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5930", env = "FUNDLENS_PORT")]
    port: u16,

    /// Database file (falls back to FUNDLENS_DB, the config file, then the
    /// platform default)
    #[arg(short, long, env = DB_ENV_VAR)]
    database: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting fundlens-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let db_path = resolve_database_path(args.database.as_deref())?;
    info!("Database path: {}", db_path.display());

    // The report service never writes; open read-only
    let pool = db::connect_readonly(&db_path)
        .await
        .context("Failed to connect to database in read-only mode")?;
    info!("Connected to database (read-only)");

    let state = AppState::new(pool);
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("fundlens-api listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        }
    }
}
