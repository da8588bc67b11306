//! SQLite execution adapter built on rusqlite.

use std::path::PathBuf;
use std::time::Duration;

use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, OpenFlags};
use serde_json::Value;

use crate::domain::{DatabaseConfig, QueryRows};
use crate::ports::{Database, DatabaseError};

/// A SQLite database file. Every execution attempt opens its own connection.
#[derive(Debug, Clone)]
pub struct SqliteDatabase {
    path: PathBuf,
    busy_timeout: Duration,
}

impl SqliteDatabase {
    pub fn new(path: impl Into<PathBuf>, config: &DatabaseConfig) -> Self {
        Self { path: path.into(), busy_timeout: Duration::from_millis(config.busy_timeout_ms) }
    }
}

impl Database for SqliteDatabase {
    type Connection = Connection;

    fn connect(&self) -> Result<Connection, DatabaseError> {
        // Opened without SQLITE_OPEN_CREATE; a missing file is a connection failure.
        if !self.path.is_file() {
            return Err(DatabaseError::Connect(format!(
                "database not found: {}",
                self.path.display()
            )));
        }

        let connection = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| {
            DatabaseError::Connect(format!("cannot open {}: {}", self.path.display(), e))
        })?;
        connection
            .busy_timeout(self.busy_timeout)
            .map_err(|e| DatabaseError::Connect(format!("cannot set busy timeout: {}", e)))?;
        Ok(connection)
    }

    #[tracing::instrument(skip(self, connection), fields(db = %self.path.display()))]
    fn execute(
        &self,
        connection: &mut Connection,
        query: &str,
    ) -> Result<QueryRows, DatabaseError> {
        let query_error = |e: rusqlite::Error| DatabaseError::Query(e.to_string());

        let mut statement = connection.prepare(query).map_err(query_error)?;
        let columns: Vec<String> =
            statement.column_names().into_iter().map(str::to_string).collect();

        let mut rows = statement.query([]).map_err(query_error)?;
        let mut records = Vec::new();
        while let Some(row) = rows.next().map_err(query_error)? {
            let mut record = Vec::with_capacity(columns.len());
            for idx in 0..columns.len() {
                let value: SqlValue = row.get(idx).map_err(query_error)?;
                record.push(to_json(value));
            }
            records.push(record);
        }

        tracing::debug!(rows = records.len(), "query executed");
        Ok(QueryRows { columns, rows: records })
    }
}

fn to_json(value: SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(n) => Value::from(n),
        SqlValue::Real(f) => {
            serde_json::Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
        }
        SqlValue::Text(s) => Value::String(s),
        SqlValue::Blob(bytes) => Value::String(format!("<blob {} bytes>", bytes.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::commands::execute::execute_once;
    use crate::domain::ExecutionResult;
    use serde_json::json;
    use tempfile::TempDir;

    fn seeded_database() -> (TempDir, SqliteDatabase) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.sqlite");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT, score REAL, avatar BLOB);
             INSERT INTO users VALUES (1, 'Asha', 4.5, x'0102');
             INSERT INTO users VALUES (2, 'Ravi', NULL, NULL);",
        )
        .unwrap();
        let db = SqliteDatabase::new(path, &DatabaseConfig::default());
        (dir, db)
    }

    #[test]
    fn executes_select_and_preserves_order() {
        let (_dir, db) = seeded_database();
        let mut conn = db.connect().unwrap();

        let rows = db
            .execute(&mut conn, "SELECT id, name, score, avatar FROM users ORDER BY id")
            .unwrap();

        assert_eq!(rows.columns, vec!["id", "name", "score", "avatar"]);
        assert_eq!(
            rows.rows[0],
            vec![json!(1), json!("Asha"), json!(4.5), json!("<blob 2 bytes>")]
        );
        assert_eq!(rows.rows[1], vec![json!(2), json!("Ravi"), Value::Null, Value::Null]);
    }

    #[test]
    fn unknown_column_is_a_query_error() {
        let (_dir, db) = seeded_database();
        let mut conn = db.connect().unwrap();

        let err = db.execute(&mut conn, "SELECT email FROM users").unwrap_err();
        match err {
            DatabaseError::Query(message) => assert!(message.contains("no such column: email")),
            other => panic!("Expected query error, got {:?}", other),
        }
    }

    #[test]
    fn missing_file_fails_to_connect_without_creating_it() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.sqlite");
        let db = SqliteDatabase::new(&path, &DatabaseConfig::default());

        assert!(matches!(db.connect(), Err(DatabaseError::Connect(_))));
        assert!(!path.exists());
    }

    #[test]
    fn execute_once_reports_failure_as_result() {
        let (_dir, db) = seeded_database();

        let result = execute_once(&db, "SELECT nope FROM users").unwrap();
        assert!(matches!(result, ExecutionResult::Failure(ref m) if m.contains("no such column")));

        let result = execute_once(&db, "SELECT COUNT(*) AS n FROM users").unwrap();
        assert_eq!(
            result,
            ExecutionResult::Success(QueryRows {
                columns: vec!["n".to_string()],
                rows: vec![vec![json!(2)]],
            })
        );
    }
}
