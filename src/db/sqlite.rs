//! SQLite database client implementation.
//!
//! Provides the `SqliteClient` struct that implements the `DatabaseClient` trait
//! for SQLite databases using sqlx.

use crate::config::DatabaseConfig;
use crate::db::{DatabaseClient, ExecutionMeta, Row, Statement, StatementResult, Value};
use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use serde_json::{Number, Value as JsonValue};
use sqlx::query::Query;
use sqlx::sqlite::{
    Sqlite, SqliteArguments, SqliteConnectOptions, SqliteConnection, SqliteJournalMode,
    SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::{Column as SqlxColumn, Row as SqlxRow, TypeInfo, ValueRef};
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Seconds to wait for a pooled connection.
const ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// SQLite database client.
#[derive(Debug, Clone)]
pub struct SqliteClient {
    pool: SqlitePool,
}

impl SqliteClient {
    /// Opens (creating if missing) the database described by the config.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let conn_str = config.to_connection_string()?;
        let in_memory = config.is_memory();

        let mut options = SqliteConnectOptions::from_str(&conn_str)
            .map_err(|e| GatewayError::config(format!("Invalid database URL: {e}")))?
            .busy_timeout(Duration::from_secs(config.busy_timeout_secs))
            .create_if_missing(true);
        if !in_memory {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        // An in-memory database lives as long as its connection, so keep
        // exactly one open for the lifetime of the pool.
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(config.max_connections.max(1))
        };

        let pool = pool_options
            .acquire_timeout(Duration::from_secs(ACQUIRE_TIMEOUT_SECS))
            .connect_with(options)
            .await
            .map_err(|e| {
                GatewayError::connection(format!(
                    "Failed to open database '{}': {e}",
                    config.display_name()
                ))
            })?;

        info!("Opened database {}", config.display_name());
        Ok(Self { pool })
    }
}

#[async_trait]
impl DatabaseClient for SqliteClient {
    async fn all(&self, statement: &Statement) -> Result<StatementResult> {
        let mut conn = self.pool.acquire().await?;
        run_statement(&mut conn, statement).await
    }

    async fn batch(&self, statements: Vec<Statement>) -> Result<Vec<StatementResult>> {
        if statements.is_empty() {
            return Ok(Vec::new());
        }

        // Dropping the transaction on error rolls back every statement.
        let mut tx = self.pool.begin().await?;
        let mut results = Vec::with_capacity(statements.len());

        for (index, statement) in statements.iter().enumerate() {
            debug!("Batch statement {} of {}", index + 1, statements.len());
            results.push(run_statement(&mut tx, statement).await?);
        }

        tx.commit().await?;
        Ok(results)
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}

/// Executes one statement on a single connection, deriving metadata from
/// the connection's change counters.
async fn run_statement(
    conn: &mut SqliteConnection,
    statement: &Statement,
) -> Result<StatementResult> {
    let (total_before,): (i64,) = sqlx::query_as("SELECT total_changes()")
        .fetch_one(&mut *conn)
        .await?;

    let start = Instant::now();
    let rows = bind_params(sqlx::query(&statement.sql), &statement.params)
        .fetch_all(&mut *conn)
        .await?;
    let duration = start.elapsed();

    let (changes, last_row_id, total_after): (i64, i64, i64) =
        sqlx::query_as("SELECT changes(), last_insert_rowid(), total_changes()")
            .fetch_one(&mut *conn)
            .await?;

    // changes() still reports the previous write after a read-only statement.
    let changed_db = total_after > total_before;
    let changes = if changed_db { changes.max(0) as u64 } else { 0 };

    debug!(
        "Executed statement with {} params: {} rows, {} changes in {:?}",
        statement.params.len(),
        rows.len(),
        changes,
        duration
    );

    let meta = ExecutionMeta {
        duration: duration.as_secs_f64() * 1000.0,
        changes,
        last_row_id,
        changed_db,
        rows_read: rows.len() as u64,
        rows_written: changes,
    };

    Ok(StatementResult::new(
        rows.iter().map(convert_row).collect(),
        meta.into_meta(),
    ))
}

/// Binds positional parameters in order.
fn bind_params<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    params: &'q [Value],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for param in params {
        query = match param {
            Value::Null => query.bind(None::<String>),
            Value::Bool(b) => query.bind(i64::from(*b)),
            Value::Int(i) => query.bind(*i),
            Value::Float(f) => query.bind(*f),
            Value::Text(s) => query.bind(s.as_str()),
        };
    }
    query
}

/// Converts a sqlx SqliteRow to our Row type.
fn convert_row(row: &SqliteRow) -> Row {
    row.columns()
        .iter()
        .map(|col| (col.name().to_string(), convert_value(row, col.ordinal())))
        .collect()
}

/// Converts a single column value based on its storage class.
fn convert_value(row: &SqliteRow, index: usize) -> JsonValue {
    let storage_class = match row.try_get_raw(index) {
        Ok(raw) if raw.is_null() => return JsonValue::Null,
        Ok(raw) => raw.type_info().name().to_string(),
        Err(_) => return JsonValue::Null,
    };

    match storage_class.as_str() {
        "INTEGER" => row
            .try_get::<i64, _>(index)
            .map(JsonValue::from)
            .unwrap_or(JsonValue::Null),
        "REAL" => row
            .try_get::<f64, _>(index)
            .ok()
            .and_then(Number::from_f64)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        "BLOB" => row
            .try_get::<Vec<u8>, _>(index)
            .map(|bytes| JsonValue::Array(bytes.into_iter().map(JsonValue::from).collect()))
            .unwrap_or(JsonValue::Null),
        _ => row
            .try_get::<String, _>(index)
            .map(JsonValue::String)
            .unwrap_or(JsonValue::Null),
    }
}
