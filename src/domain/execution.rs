//! Query execution results.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rows returned by a successful execution, in database order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryRows {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl QueryRows {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Outcome of one execution attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionResult {
    Success(QueryRows),
    /// The database rejected the query; the message is fed back verbatim.
    Failure(String),
}

