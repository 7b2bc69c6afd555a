//! Warehouse session capability
//!
//! Every interaction opens its own session through a [`SessionFactory`] and
//! hands it to the components that need it. Nothing holds a global session.

use crate::db::queries::SqlBuilder;
use crate::error::AppError;
use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

/// Text result of a statement, as returned by the warehouse
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl ResultSet {
    /// Values of one column by position, skipping NULL and short rows
    pub fn project(&self, index: usize) -> Vec<String> {
        self.rows
            .iter()
            .filter_map(|row| row.get(index).cloned().flatten())
            .collect()
    }

    /// Position of a column, matched case-insensitively
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
    }

    /// First cell of the first row
    pub fn scalar(&self) -> Option<String> {
        self.rows.first().and_then(|row| row.first().cloned().flatten())
    }
}

/// A live warehouse session scoped to one interaction
#[async_trait]
pub trait WarehouseSession: Send + Sync {
    /// Execute SQL text and collect every row as text
    async fn query(&self, sql: &str) -> Result<ResultSet, AppError>;

    /// Call a stored procedure by name with positional arguments.
    ///
    /// Returns the first cell of the procedure's result.
    async fn call(&self, procedure: &str, args: &[&str]) -> Result<Option<String>, AppError> {
        let sql = SqlBuilder::call(procedure, args);
        debug!("Calling procedure: {}", procedure);

        let result = self
            .query(&sql)
            .await
            .map_err(|e| procedure_error(procedure, e))?;

        Ok(result.scalar())
    }
}

/// Attribute a failed CALL to its procedure.
///
/// Session availability errors pass through unchanged.
pub fn procedure_error(procedure: &str, error: AppError) -> AppError {
    if matches!(error, AppError::NotConnected(_) | AppError::Pool(_)) {
        return error;
    }

    let message = match error {
        AppError::Database(db) => db.to_string(),
        AppError::Internal(msg) => msg,
        other => other.to_string(),
    };

    AppError::Procedure {
        procedure: procedure.to_string(),
        message,
    }
}

/// Opens sessions, one per interaction
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open(&self) -> Result<Box<dyn WarehouseSession>, AppError>;
}
