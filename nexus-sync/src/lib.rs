//! nexus-sync library interface
//!
//! Aggregates assignment data from learning-management upstreams (Canvas,
//! Gradescope) into a unified model, and syncs Canvas assignments into a
//! local row store on explicit request. Exposed as a library for
//! integration testing; the binary lives in `main.rs`.

pub mod aggregate;
pub mod api;
pub mod credentials;
pub mod db;
pub mod error;
pub mod normalize;
pub mod pagination;
pub mod services;
pub mod sync;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::services::canvas_client;
use crate::services::gradescope_client;

/// Service tunables resolved once at startup and threaded by value
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Default Canvas base URL (normalized); per-request overrides win
    pub canvas_base_url: String,
    /// Default Gradescope base URL; per-request overrides win
    pub gradescope_base_url: String,
    /// Optional cap on concurrent per-course fetches during aggregation.
    /// `None` preserves the unbounded behavior.
    pub concurrency: Option<usize>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            canvas_base_url: canvas_client::DEFAULT_BASE_URL.to_string(),
            gradescope_base_url: gradescope_client::DEFAULT_BASE_URL.to_string(),
            concurrency: None,
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Shared HTTP client for the pass-through proxy
    pub http: reqwest::Client,
    pub config: ServiceConfig,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, http: reqwest::Client, config: ServiceConfig) -> Self {
        Self {
            db,
            http,
            config,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::sync_routes())
        .merge(api::assignment_routes())
        .merge(api::proxy_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
