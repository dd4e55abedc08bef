//! Route handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use tracing::{debug, warn};

use super::request::{parse_body, BatchRequest, QueryRequest};
use super::response::{BatchResponse, HealthResponse, QueryResponse};
use super::GatewayState;
use crate::error::{GatewayError, Result};

/// `GET /` and `GET /health`.
pub async fn health_handler(State(state): State<Arc<GatewayState>>) -> Json<HealthResponse> {
    Json(HealthResponse::new(&state.service, &state.database))
}

/// `POST /query`: execute one statement and return its rows.
pub async fn query_handler(
    State(state): State<Arc<GatewayState>>,
    body: Bytes,
) -> Result<Json<QueryResponse>> {
    let request = parse_body(&body)
        .and_then(|json| QueryRequest::from_json(&json))
        .inspect_err(log_failure)?;
    let statement = request.prepare(state.db.as_ref());
    debug!("Executing query with {} params", statement.params.len());

    let result = state.db.all(&statement).await.inspect_err(log_failure)?;
    Ok(Json(result.into()))
}

/// `POST /batch`: execute every statement in one batch call.
pub async fn batch_handler(
    State(state): State<Arc<GatewayState>>,
    body: Bytes,
) -> Result<Json<BatchResponse>> {
    let request = parse_body(&body)
        .and_then(|json| BatchRequest::from_json(&json))
        .inspect_err(log_failure)?;
    let statements = request.prepare(state.db.as_ref());
    debug!("Executing batch of {} statements", statements.len());

    let results = state.db.batch(statements).await.inspect_err(log_failure)?;
    Ok(Json(results.into()))
}

/// Anything no route matched.
pub async fn not_found_handler() -> GatewayError {
    GatewayError::NotFound
}

fn log_failure(err: &GatewayError) {
    warn!("{}: {}", err.category(), err);
}
