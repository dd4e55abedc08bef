//! Mock database clients for testing.
//!
//! Provides in-memory implementations that record what the gateway asks of
//! the database and answer with predefined results.

use super::{DatabaseClient, Statement, StatementResult};
use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use tokio::sync::Mutex;

/// A mock database client that records statements and returns a canned result.
#[derive(Default)]
pub struct MockDatabaseClient {
    result: StatementResult,
    executed: Mutex<Vec<Statement>>,
    batches: Mutex<Vec<Vec<Statement>>>,
}

impl MockDatabaseClient {
    /// Creates a mock whose results carry neither rows nor metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock that answers every statement with the given result.
    pub fn with_result(result: StatementResult) -> Self {
        Self {
            result,
            ..Default::default()
        }
    }

    /// Statements passed to `all`, in call order.
    pub async fn executed(&self) -> Vec<Statement> {
        self.executed.lock().await.clone()
    }

    /// Statement lists passed to `batch`, one entry per call.
    pub async fn batches(&self) -> Vec<Vec<Statement>> {
        self.batches.lock().await.clone()
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn all(&self, statement: &Statement) -> Result<StatementResult> {
        self.executed.lock().await.push(statement.clone());
        Ok(self.result.clone())
    }

    async fn batch(&self, statements: Vec<Statement>) -> Result<Vec<StatementResult>> {
        let results = vec![self.result.clone(); statements.len()];
        self.batches.lock().await.push(statements);
        Ok(results)
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// A database client whose every call fails with the same driver message.
pub struct FailingDatabaseClient {
    message: String,
}

impl FailingDatabaseClient {
    /// Creates a client failing with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl DatabaseClient for FailingDatabaseClient {
    async fn all(&self, _statement: &Statement) -> Result<StatementResult> {
        Err(GatewayError::query(self.message.clone()))
    }

    async fn batch(&self, _statements: Vec<Statement>) -> Result<Vec<StatementResult>> {
        Err(GatewayError::query(self.message.clone()))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
