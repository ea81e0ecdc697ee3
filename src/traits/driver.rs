use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ExecutionResult, SqlValue};

/// A database engine the executor can run statements against.
///
/// Drivers receive statement text already normalized for their dialect. They are
/// responsible for:
/// - Converting `SqlValue` parameters to native types, strictly by position
/// - Executing the statement and shaping the outcome as an `ExecutionResult`
/// - Reporting engine rejections as `ExamPrepError::QueryFailed` with the engine's
///   message intact
#[async_trait]
pub trait DatabaseDriver: Send + Sync {
    async fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<ExecutionResult>;

    /// Round-trip a trivial statement. Returns false instead of failing.
    async fn test_connection(&self) -> bool;
}
