//! Shared testing utilities for nlsql CLI tests.

use assert_cmd::Command;
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Path the Generative Language API client posts to with the default model.
pub const GENERATE_PATH: &str = "/models/gemini-pro:generateContent";

/// Schema written into every test workspace.
pub const SCHEMA_JSON: &str = r#"{
  "users": {
    "columns": {"id": "INTEGER PRIMARY KEY", "name": "TEXT", "country": "TEXT"}
  }
}"#;

/// Testing harness providing an isolated workspace and a fake LLM endpoint.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
    server: ServerGuard,
}

#[allow(dead_code)]
impl TestContext {
    /// Create a workspace holding `schema.json` and an `nlsql.toml` pointing at the mock server.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let server = Server::new();

        fs::write(root.path().join("schema.json"), SCHEMA_JSON).expect("Failed to write schema");
        let config = format!(
            "[llm]\napi_url = \"{}\"\nmax_retries = 1\nretry_delay_ms = 1\ntimeout_secs = 5\n",
            server.url()
        );
        fs::write(root.path().join("nlsql.toml"), config).expect("Failed to write config");

        Self { root, server }
    }

    pub fn work_dir(&self) -> &Path {
        self.root.path()
    }

    /// Build a command for invoking the compiled `nlsql` binary in the workspace.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("nlsql").expect("Failed to locate nlsql binary");
        cmd.current_dir(self.work_dir())
            .env("GOOGLE_API_KEY", "test-key")
            .env_remove("NLSQL_LOG");
        cmd
    }

    /// Answer every prompt whose body matches `pattern` with `reply`, `hits` times.
    pub fn mock_reply(&mut self, pattern: &str, reply: &str, hits: usize) -> Mock {
        let body = json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": reply}]},
                "finishReason": "STOP"
            }]
        });
        self.server
            .mock("POST", GENERATE_PATH)
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::Regex(pattern.to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(hits)
            .create()
    }

    /// Fail every request with `status`.
    pub fn mock_status(&mut self, status: usize) -> Mock {
        self.server
            .mock("POST", GENERATE_PATH)
            .with_status(status)
            .with_body(r#"{"error": {"message": "unavailable"}}"#)
            .create()
    }

    /// Create a SQLite database in the workspace with a populated `users` table.
    pub fn create_database(&self, name: &str) -> PathBuf {
        let path = self.work_dir().join(name);
        let conn = rusqlite::Connection::open(&path).expect("Failed to create database");
        conn.execute_batch(
            "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT, country TEXT);
             INSERT INTO users (name, country) VALUES ('Asha', 'India'), ('Lena', 'Germany');",
        )
        .expect("Failed to seed database");
        path
    }

    pub fn read_file(&self, name: &str) -> String {
        fs::read_to_string(self.work_dir().join(name)).expect("Failed to read file")
    }
}
