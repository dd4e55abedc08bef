//! Shared helpers for driving the router in tests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use db_gateway::config::DatabaseConfig;
use db_gateway::db::{DatabaseClient, SqliteClient};
use db_gateway::gateway::{self, GatewayState};
use serde_json::Value as JsonValue;
use tower::ServiceExt;

pub const SERVICE: &str = "db-gateway";
pub const DATABASE: &str = "test-db";

/// A response reduced to the parts tests assert on.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parses the body as JSON.
    pub fn json(&self) -> JsonValue {
        serde_json::from_slice(&self.body).expect("response body is JSON")
    }
}

/// Builds a router over the given database.
pub fn router_with(db: Arc<dyn DatabaseClient>) -> Router {
    gateway::router(Arc::new(GatewayState::new(db, SERVICE, DATABASE)))
}

/// Builds a router over a fresh in-memory SQLite database.
pub async fn sqlite_router() -> Router {
    let client = SqliteClient::connect(&DatabaseConfig::from_url("sqlite::memory:"))
        .await
        .expect("in-memory database opens");
    router_with(Arc::new(client))
}

/// Sends one request through the router.
pub async fn send(router: &Router, method: Method, uri: &str, body: Option<&str>) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    let request = builder
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();

    TestResponse {
        status,
        headers,
        body,
    }
}

/// Sends a POST with a JSON body.
pub async fn post(router: &Router, uri: &str, body: &str) -> TestResponse {
    send(router, Method::POST, uri, Some(body)).await
}

/// Sends a GET.
pub async fn get(router: &Router, uri: &str) -> TestResponse {
    send(router, Method::GET, uri, None).await
}
