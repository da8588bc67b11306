use crate::domain::{AppError, ExecutionResult};
use crate::ports::{Database, DatabaseError};

/// Run `query` once on a fresh connection.
///
/// A rejected query is an `ExecutionResult::Failure`; only a connection
/// failure is returned as `Err`. The connection is dropped before returning.
pub fn execute_once<D: Database>(db: &D, query: &str) -> Result<ExecutionResult, DatabaseError> {
    let mut connection = db.connect()?;
    match db.execute(&mut connection, query) {
        Ok(rows) => {
            tracing::debug!(rows = rows.len(), "query executed");
            Ok(ExecutionResult::Success(rows))
        }
        Err(DatabaseError::Query(message)) => {
            tracing::debug!(error = %message, "query rejected");
            Ok(ExecutionResult::Failure(message))
        }
        Err(err) => Err(err),
    }
}

/// Execute the exec command against the configured database.
pub fn execute<D: Database>(
    database: Option<&D>,
    query: &str,
) -> Result<ExecutionResult, AppError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::Validation("Query must not be empty".to_string()));
    }
    let db = database.ok_or(AppError::DatabaseNotConfigured)?;
    Ok(execute_once(db, query)?)
}
