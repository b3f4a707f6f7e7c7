//! palaro-rt library - results tabulation service
//!
//! Read-only over the results store. Every request loads a fresh snapshot,
//! runs the engine, and responds; nothing is cached between requests.

use axum::Router;
use sqlx::SqlitePool;

pub mod api;
pub mod db;
pub mod engine;
pub mod error;
pub mod pagination;

pub use error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Results store pool (read-only)
    pub db: SqlitePool,
    /// Tabulation feed rows per page
    pub page_size: i64,
}

impl AppState {
    pub fn new(db: SqlitePool, page_size: i64) -> Self {
        Self { db, page_size }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::http::Method;
    use axum::routing::get;
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::trace::TraceLayer;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/api/buildinfo", get(api::get_build_info))
        .route("/api/tabulation", get(api::get_tabulation))
        .route("/api/medals", get(api::get_medal_table))
        .route("/api/medals/levels", get(api::get_level_medal_tables))
        .merge(api::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
