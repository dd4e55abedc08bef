//! Statement and result types for the database binding.
//!
//! Defines the structures used to describe prepared statements, their bound
//! parameters, and what the database reports back after executing them.

use crate::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// A row of data, keyed by column name in result-set order.
pub type Row = Map<String, JsonValue>;

/// Driver-reported execution metadata.
pub type Meta = Map<String, JsonValue>;

/// A scalar value bound to a statement parameter.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Value {
    /// NULL value.
    #[default]
    Null,

    /// Boolean value.
    Bool(bool),

    /// Signed integer (up to i64).
    Int(i64),

    /// Floating point number.
    Float(f64),

    /// Text value.
    Text(String),
}

impl Value {
    /// Converts a JSON value into a bindable scalar.
    ///
    /// Arrays and objects cannot be bound and are rejected with the
    /// database's own wording for unsupported types.
    pub fn from_json(value: &JsonValue) -> Result<Self> {
        match value {
            JsonValue::Null => Ok(Value::Null),
            JsonValue::Bool(b) => Ok(Value::Bool(*b)),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Value::Float(f))
                } else {
                    Err(GatewayError::query(format!(
                        "Type 'number' not supported for value {n}"
                    )))
                }
            }
            JsonValue::String(s) => Ok(Value::Text(s.clone())),
            JsonValue::Array(_) => Err(GatewayError::query(format!(
                "Type 'array' not supported for value {value}"
            ))),
            JsonValue::Object(_) => Err(GatewayError::query(format!(
                "Type 'object' not supported for value {value}"
            ))),
        }
    }
}

// Conversion implementations for common types
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}

/// A prepared statement, optionally carrying positional parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    /// SQL text, passed to the database verbatim.
    pub sql: String,

    /// Positional parameters, bound in order.
    #[serde(default)]
    pub params: Vec<Value>,
}

impl Statement {
    /// Prepares a statement with no bound parameters.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Binds positional parameters, replacing any previously bound.
    pub fn bind<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.params = values.into_iter().map(Into::into).collect();
        self
    }
}

/// What the database returned for one executed statement.
///
/// Either part may be absent; callers default them to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementResult {
    /// Rows produced by the statement.
    pub results: Option<Vec<Row>>,

    /// Execution metadata.
    pub meta: Option<Meta>,
}

impl StatementResult {
    /// Creates a result with the given rows and metadata.
    pub fn new(results: Vec<Row>, meta: Meta) -> Self {
        Self {
            results: Some(results),
            meta: Some(meta),
        }
    }
}

/// Metadata the SQLite binding reports for each statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExecutionMeta {
    /// Wall-clock execution time in milliseconds.
    pub duration: f64,

    /// Rows modified by the statement.
    pub changes: u64,

    /// Rowid of the most recent successful insert on the connection.
    pub last_row_id: i64,

    /// Whether the statement modified the database.
    pub changed_db: bool,

    /// Rows returned by the statement.
    pub rows_read: u64,

    /// Rows written by the statement.
    pub rows_written: u64,
}

impl ExecutionMeta {
    /// Converts the metadata into the JSON mapping returned to callers.
    pub fn into_meta(self) -> Meta {
        match serde_json::to_value(self) {
            Ok(JsonValue::Object(map)) => map,
            _ => Meta::new(),
        }
    }
}
