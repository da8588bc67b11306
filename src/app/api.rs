//! API Facade for the application.
//!
//! This module exposes high-level functions that glue together configuration,
//! context creation and command execution.

use std::path::PathBuf;

use crate::adapters::schema_file::load_schema;
use crate::adapters::session_file::{load_session, save_session};
use crate::adapters::{GeminiClient, RetryPolicy, RetryingLlmClient, SqliteDatabase};
use crate::app::config::load_config;
use crate::app::{
    AppContext,
    commands::{ask, execute, generate, refine},
};
use crate::domain::{AppConfig, Session, initial_prompt};

pub use crate::app::commands::ask::AskOutcome;
pub use crate::domain::{
    AppError, ExecutionResult, QueryRows, RefinementMode, RefinementOutcome, RefinementStatus,
};

/// File locations shared by every command.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Explicit configuration file; `nlsql.toml` in the working directory otherwise.
    pub config: Option<PathBuf>,
    pub schema: PathBuf,
    /// Overrides `[database].path`.
    pub database: Option<PathBuf>,
    /// JSON file carrying the session between invocations.
    pub session: Option<PathBuf>,
}

impl Settings {
    pub fn new(schema: impl Into<PathBuf>) -> Self {
        Self { config: None, schema: schema.into(), database: None, session: None }
    }

    fn load_config(&self) -> Result<AppConfig, AppError> {
        load_config(self.config.as_deref(), &std::env::current_dir()?)
    }

    fn load_session(&self) -> Result<Session, AppError> {
        match &self.session {
            Some(path) => load_session(path),
            None => Ok(Session::new()),
        }
    }

    fn save_session(&self, session: &Session) -> Result<(), AppError> {
        match &self.session {
            Some(path) => save_session(path, session),
            None => Ok(()),
        }
    }

    fn open_database(&self, config: &AppConfig) -> Option<SqliteDatabase> {
        self.database
            .as_deref()
            .or(config.database.path.as_deref())
            .map(|path| SqliteDatabase::new(path, &config.database))
    }
}

type LiveContext = AppContext<RetryingLlmClient, SqliteDatabase>;

/// Create an `AppContext` backed by the Generative Language API and SQLite.
fn create_context(settings: &Settings, config: &AppConfig) -> Result<LiveContext, AppError> {
    let client = GeminiClient::from_env_with_config(&config.llm)?;
    let llm = RetryingLlmClient::new(Box::new(client), RetryPolicy::from_config(&config.llm));
    Ok(AppContext::new(llm, settings.open_database(config), config.refinement.clone()))
}

/// Render the initial prompt for `question` without calling the model.
pub fn prompt_preview(settings: &Settings, question: &str) -> Result<String, AppError> {
    let question = question.trim();
    if question.is_empty() {
        return Err(AppError::EmptyQuestion);
    }
    let schema = load_schema(&settings.schema)?;
    initial_prompt(&schema, question)
}

/// Generate a first query for `question` without refinement.
pub fn generate(settings: &Settings, question: &str) -> Result<String, AppError> {
    if question.trim().is_empty() {
        return Err(AppError::EmptyQuestion);
    }
    let config = settings.load_config()?;
    let schema = load_schema(&settings.schema)?;
    let ctx = create_context(settings, &config)?;
    generate::execute(&ctx, &schema, question)
}

/// Generate and refine a query for `question`, updating the session file.
pub fn ask(
    settings: &Settings,
    question: &str,
    mode: RefinementMode,
) -> Result<AskOutcome, AppError> {
    if question.trim().is_empty() {
        return Err(AppError::EmptyQuestion);
    }
    let config = settings.load_config()?;
    let schema = load_schema(&settings.schema)?;
    let ctx = create_context(settings, &config)?;
    let mut session = settings.load_session()?;

    let outcome = ask::execute(&ctx, &mut session, &schema, question, mode)?;
    settings.save_session(&session)?;
    Ok(outcome)
}

/// Answer a clarification request and retry `question`.
pub fn clarify(
    settings: &Settings,
    question: &str,
    answer: &str,
    mode: RefinementMode,
) -> Result<AskOutcome, AppError> {
    let config = settings.load_config()?;
    let schema = load_schema(&settings.schema)?;
    let ctx = create_context(settings, &config)?;
    let mut session = settings.load_session()?;

    let outcome = ask::clarify(&ctx, &mut session, &schema, question, answer, mode)?;
    settings.save_session(&session)?;
    Ok(outcome)
}

/// Refine `query`, or the session's last query when none is given.
pub fn refine(
    settings: &Settings,
    query: Option<&str>,
    requirement: Option<&str>,
    mode: RefinementMode,
) -> Result<RefinementOutcome, AppError> {
    let mut session = settings.load_session()?;
    let query = match query.or(session.last_query.as_deref()) {
        Some(query) => query.to_string(),
        None => {
            return Err(AppError::Validation(
                "No query given and the session holds no previous query".to_string(),
            ));
        }
    };

    let config = settings.load_config()?;
    let schema = load_schema(&settings.schema)?;
    let ctx = create_context(settings, &config)?;

    let question = session.last_question.clone();
    let request = refine::RefineRequest::new(&schema, &query, mode)
        .with_question(question.as_deref())
        .with_extra_requirement(requirement);
    let outcome = refine::execute(&ctx, request)?;

    session.record(None, &outcome);
    settings.save_session(&session)?;
    Ok(outcome)
}

/// Execute `query` once against the configured database.
pub fn execute(settings: &Settings, query: &str) -> Result<ExecutionResult, AppError> {
    let config = settings.load_config()?;
    let database = settings.open_database(&config);
    execute::execute(database.as_ref(), query)
}
