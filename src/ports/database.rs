//! Database port definition.

use thiserror::Error;

use crate::domain::QueryRows;

/// Failure reported by a database adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatabaseError {
    /// A connection could not be established.
    #[error("Database connection failed: {0}")]
    Connect(String),

    /// The database rejected the query (syntax, missing object, type error, permission).
    #[error("{0}")]
    Query(String),
}

/// Port for query execution.
///
/// Connections are acquired per execution attempt and released when dropped.
pub trait Database {
    type Connection;

    /// Open a new connection.
    fn connect(&self) -> Result<Self::Connection, DatabaseError>;

    /// Run `query` on `connection` and collect every row in order.
    fn execute(
        &self,
        connection: &mut Self::Connection,
        query: &str,
    ) -> Result<QueryRows, DatabaseError>;
}
