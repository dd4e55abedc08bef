//! HTTP surface of the gateway.
//!
//! Routes, in priority order:
//!
//! - `OPTIONS *` – CORS preflight, answered before routing
//! - `GET /`, `GET /health` – static service descriptor
//! - `POST /query` – execute one statement
//! - `POST /batch` – execute statements in one batch call
//! - anything else – `404 {"success": false, "error": "Not found"}`
//!
//! Every response carries `Access-Control-Allow-Origin: *`.

mod cors;
mod handlers;
mod request;
mod response;

pub use cors::{ALLOW_HEADERS, ALLOW_METHODS, ALLOW_ORIGIN};
pub use request::{BatchRequest, QueryRequest, EXPECTED_ARRAY, MISSING_SQL};
pub use response::{BatchResponse, HealthResponse, QueryResponse, StatementOutput};

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::db::DatabaseClient;
use handlers::{batch_handler, health_handler, not_found_handler, query_handler};

/// State shared by every request: the database handle and the names the
/// health check reports. Read-only after startup.
pub struct GatewayState {
    pub db: Arc<dyn DatabaseClient>,
    pub service: String,
    pub database: String,
}

impl GatewayState {
    pub fn new(
        db: Arc<dyn DatabaseClient>,
        service: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            db,
            service: service.into(),
            database: database.into(),
        }
    }
}

/// Builds the gateway router.
///
/// Known paths hit with the wrong method fall through to the 404 handler
/// rather than axum's default 405. Request bodies are not size-limited.
pub fn router(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route("/", get(health_handler).fallback(not_found_handler))
        .route("/health", get(health_handler).fallback(not_found_handler))
        .route("/query", post(query_handler).fallback(not_found_handler))
        .route("/batch", post(batch_handler).fallback(not_found_handler))
        .fallback(not_found_handler)
        .layer(DefaultBodyLimit::disable())
        .layer(middleware::from_fn(cors::cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
