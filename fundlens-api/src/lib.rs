//! fundlens-api library - report data HTTP service
//!
//! Read-only service exposing the donation report aggregates to the
//! interactive front-end tables.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (read-only)
    pub db: SqlitePool,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build application router.
///
/// CORS is permissive: the data tables are served from a different origin
/// and everything here is public read-only data.
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/api/v1/transaction-data", get(api::get_transaction_data))
        .route("/api/v1/data-table", get(api::get_data_table))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
