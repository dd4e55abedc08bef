//! Database binding for the gateway.
//!
//! Provides a trait-based interface for statement execution, allowing the
//! gateway to be driven by the SQLite backend in production and by mock
//! clients in tests.

mod mock;
mod sqlite;
mod types;

pub use mock::{FailingDatabaseClient, MockDatabaseClient};
pub use sqlite::SqliteClient;
pub use types::{ExecutionMeta, Meta, Row, Statement, StatementResult, Value};

use crate::config::DatabaseConfig;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Opens the database described by the configuration.
///
/// This is the central factory function for database connections.
pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn DatabaseClient>> {
    let client = SqliteClient::connect(config).await?;
    Ok(Arc::new(client))
}

/// Trait defining the interface for database clients.
///
/// All execution is async and returns Results with GatewayError. Statements
/// are prepared with [`DatabaseClient::prepare`] and bound with
/// [`Statement::bind`].
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Prepares a statement for execution. SQL text is passed through verbatim.
    fn prepare(&self, sql: &str) -> Statement {
        Statement::new(sql)
    }

    /// Executes a single statement and returns every row it produces.
    async fn all(&self, statement: &Statement) -> Result<StatementResult>;

    /// Executes statements as one unit, returning one result per statement
    /// in submission order.
    async fn batch(&self, statements: Vec<Statement>) -> Result<Vec<StatementResult>>;

    /// Closes the database connection.
    async fn close(&self) -> Result<()>;
}
