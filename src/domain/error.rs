use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::ports::{DatabaseError, LlmError};

/// Library-wide error type for nlsql operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration or environment issue.
    #[error("{0}")]
    Configuration(String),

    /// Configuration file parsed but holds invalid values.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Explicitly requested configuration file does not exist.
    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    /// Schema document is missing.
    #[error("Schema file not found: {}", .0.display())]
    SchemaNotFound(PathBuf),

    /// Schema document could not be parsed.
    #[error("Failed to parse schema {}: {details}", path.display())]
    SchemaParse { path: PathBuf, details: String },

    /// Session file could not be read or written.
    #[error("Session file {}: {details}", path.display())]
    Session { path: PathBuf, details: String },

    /// The user question was empty.
    #[error("Please enter a question")]
    EmptyQuestion,

    /// Input failed validation before any LLM call.
    #[error("{0}")]
    Validation(String),

    /// Prompt template failed to render.
    #[error("Prompt rendering failed: {0}")]
    PromptRender(String),

    /// The LLM service failed.
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// The model answered with a failure-marked reply instead of a query.
    #[error("Model reported a problem: {0}")]
    ModelReportedError(String),

    /// Execution was requested but no database is configured.
    #[error("No database configured. Pass --database or set [database].path in nlsql.toml")]
    DatabaseNotConfigured,

    /// The database could not be reached.
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl AppError {
    /// Provide an `io::ErrorKind`-like view for callers.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            AppError::Io(err) => err.kind(),
            AppError::Configuration(_)
            | AppError::InvalidConfig(_)
            | AppError::TomlParseError(_)
            | AppError::SchemaParse { .. }
            | AppError::Session { .. }
            | AppError::EmptyQuestion
            | AppError::Validation(_)
            | AppError::PromptRender(_)
            | AppError::ModelReportedError(_) => io::ErrorKind::InvalidInput,
            AppError::ConfigNotFound(_)
            | AppError::SchemaNotFound(_)
            | AppError::DatabaseNotConfigured => io::ErrorKind::NotFound,
            AppError::Llm(_) | AppError::Database(_) => io::ErrorKind::Other,
        }
    }
}
