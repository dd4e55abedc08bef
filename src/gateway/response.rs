//! Response envelopes returned by the gateway.

use crate::db::{Meta, Row, StatementResult};
use serde::Serialize;

/// One statement's output with absent parts defaulted to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatementOutput {
    pub results: Vec<Row>,
    pub meta: Meta,
}

impl From<StatementResult> for StatementOutput {
    fn from(result: StatementResult) -> Self {
        Self {
            results: result.results.unwrap_or_default(),
            meta: result.meta.unwrap_or_default(),
        }
    }
}

/// `POST /query` success: `{ success, results, meta }`.
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub success: bool,
    #[serde(flatten)]
    pub output: StatementOutput,
}

impl From<StatementResult> for QueryResponse {
    fn from(result: StatementResult) -> Self {
        Self {
            success: true,
            output: result.into(),
        }
    }
}

/// `POST /batch` success: `{ success, results: [{ results, meta }, ...] }`.
#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub success: bool,
    pub results: Vec<StatementOutput>,
}

impl From<Vec<StatementResult>> for BatchResponse {
    fn from(results: Vec<StatementResult>) -> Self {
        Self {
            success: true,
            results: results.into_iter().map(StatementOutput::from).collect(),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: String,
    pub database: String,
    pub endpoints: Endpoints,
}

/// Endpoints advertised by the health check.
#[derive(Debug, Serialize)]
pub struct Endpoints {
    pub query: &'static str,
    pub batch: &'static str,
}

impl HealthResponse {
    pub fn new(service: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            status: "ok",
            service: service.into(),
            database: database.into(),
            endpoints: Endpoints {
                query: "POST /query",
                batch: "POST /batch",
            },
        }
    }
}
