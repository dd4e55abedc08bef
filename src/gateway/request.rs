//! Request body parsing for the query and batch endpoints.

use crate::db::{DatabaseClient, Statement, Value};
use crate::error::{GatewayError, Result};
use serde_json::Value as JsonValue;

pub const MISSING_SQL: &str = "Missing SQL query";
pub const EXPECTED_ARRAY: &str = "Expected array of statements";

/// Parses a raw request body as JSON.
///
/// Malformed JSON is an execution-level failure carrying the parser message.
pub fn parse_body(body: &[u8]) -> Result<JsonValue> {
    serde_json::from_slice(body).map_err(|e| GatewayError::query(e.to_string()))
}

/// A single statement as submitted over HTTP: `{ sql, params? }`.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub sql: String,
    pub params: Option<Vec<Value>>,
}

impl QueryRequest {
    /// Reads the body of `POST /query`.
    pub fn from_json(body: &JsonValue) -> Result<Self> {
        let sql = match body.get("sql") {
            Some(JsonValue::String(sql)) if !sql.is_empty() => sql.clone(),
            _ => return Err(GatewayError::bad_request(MISSING_SQL)),
        };

        Ok(Self {
            sql,
            params: parse_params(body.get("params"))?,
        })
    }

    /// Reads one entry of a batch. Malformed entries fail the whole batch.
    fn from_batch_entry(index: usize, entry: &JsonValue) -> Result<Self> {
        let sql = match entry.get("sql") {
            Some(JsonValue::String(sql)) if !sql.is_empty() => sql.clone(),
            _ => {
                return Err(GatewayError::query(format!(
                    "Missing SQL in statements[{index}]"
                )))
            }
        };

        Ok(Self {
            sql,
            params: parse_params(entry.get("params"))?,
        })
    }

    /// Prepares the statement, binding parameters only when they were given.
    pub fn prepare(&self, db: &dyn DatabaseClient) -> Statement {
        let statement = db.prepare(&self.sql);
        match &self.params {
            Some(params) => statement.bind(params.iter().cloned()),
            None => statement,
        }
    }
}

fn parse_params(params: Option<&JsonValue>) -> Result<Option<Vec<Value>>> {
    match params {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Array(values)) => values
            .iter()
            .map(Value::from_json)
            .collect::<Result<Vec<_>>>()
            .map(Some),
        Some(_) => Err(GatewayError::query("params must be an array")),
    }
}

/// The body of `POST /batch`: either `[...]` or `{ "statements": [...] }`.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRequest {
    pub statements: Vec<QueryRequest>,
}

impl BatchRequest {
    pub fn from_json(body: &JsonValue) -> Result<Self> {
        // A non-null `statements` field wins; otherwise the body itself must be the list.
        let resolved = match body.get("statements") {
            Some(statements) if !statements.is_null() => statements,
            _ => body,
        };

        let JsonValue::Array(entries) = resolved else {
            return Err(GatewayError::bad_request(EXPECTED_ARRAY));
        };

        let statements = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| QueryRequest::from_batch_entry(index, entry))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { statements })
    }

    /// Prepares every statement in submission order.
    pub fn prepare(&self, db: &dyn DatabaseClient) -> Vec<Statement> {
        self.statements.iter().map(|s| s.prepare(db)).collect()
    }
}
