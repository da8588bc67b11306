//! Iterative query refinement.
//!
//! Each round renders a refinement prompt from the current candidate and the
//! error context, asks the model for a corrected query, and classifies the
//! reply. In execution mode a marker-free candidate is also run against the
//! database; a rejection becomes the next round's error.

use crate::app::AppContext;
use crate::app::commands::execute::execute_once;
use crate::domain::{
    AppError, ExecutionResult, PromptContext, RefinementError, RefinementMode, RefinementOutcome,
    RefinementState, RefinementStatus, ReplyKind, Schema, classify_reply, refinement_prompt,
};
use crate::ports::{Database, LlmClient};

/// Inputs for one refinement loop.
#[derive(Debug, Clone, Copy)]
pub struct RefineRequest<'a> {
    pub schema: &'a Schema,
    pub query: &'a str,
    /// Question the query is meant to answer, shown to the model when known.
    pub question: Option<&'a str>,
    pub mode: RefinementMode,
    pub extra_requirement: Option<&'a str>,
}

impl<'a> RefineRequest<'a> {
    pub fn new(schema: &'a Schema, query: &'a str, mode: RefinementMode) -> Self {
        Self { schema, query, question: None, mode, extra_requirement: None }
    }

    pub fn with_question(mut self, question: Option<&'a str>) -> Self {
        self.question = question;
        self
    }

    pub fn with_extra_requirement(mut self, requirement: Option<&'a str>) -> Self {
        self.extra_requirement = requirement;
        self
    }
}

/// Run the refinement loop until it succeeds, stops, or exhausts its budget.
///
/// Invalid input is an `Err`; every other ending, including an aborted loop,
/// is reported through the outcome's status.
#[tracing::instrument(skip_all, fields(mode = ?request.mode))]
pub fn execute<L, D>(
    ctx: &AppContext<L, D>,
    request: RefineRequest<'_>,
) -> Result<RefinementOutcome, AppError>
where
    L: LlmClient,
    D: Database,
{
    let query = request.query.trim();
    if query.is_empty() {
        return Err(AppError::Validation("Query must not be empty".to_string()));
    }
    let database = database_for_mode(ctx, request.mode)?;

    let config = ctx.refinement();
    let mut state = RefinementState::new(query, request.mode);

    while state.iteration_count < config.max_iterations {
        state.iteration_count += 1;
        let round = state.iteration_count;

        let error_context = state.error_context(config.error_context);
        let prompt_ctx = PromptContext::new(request.schema, &state.current_query)
            .with_question(request.question)
            .with_prior_error(error_context.as_deref())
            .with_extra_requirement(request.extra_requirement);
        let prompt = refinement_prompt(&prompt_ctx)?;

        let reply = match ctx.llm().generate(&prompt) {
            Ok(reply) => reply,
            Err(err) if err.is_outage() => {
                tracing::warn!(round, "LLM unavailable, stopping refinement: {}", err);
                let status = RefinementStatus::Aborted { reason: err.to_string() };
                return Ok(state.finish(status, None));
            }
            Err(err) => {
                tracing::warn!(round, "unusable model response: {}", err);
                state.record_error(RefinementError::Adapter(err.to_string()));
                continue;
            }
        };

        let candidate = match classify_reply(&reply) {
            ReplyKind::Sql(sql) => sql,
            ReplyKind::FailureMarked(text) => {
                tracing::info!(round, "model reply carries a failure marker");
                state.current_query = text.clone();
                state.record_error(RefinementError::Model(text));
                continue;
            }
            ReplyKind::Clarification(question) => {
                tracing::info!(round, "model asked for clarification");
                return Ok(state.finish(RefinementStatus::NeedsClarification { question }, None));
            }
            ReplyKind::Empty => {
                tracing::warn!(round, "model returned an empty reply");
                state.record_error(RefinementError::Adapter("empty reply".to_string()));
                continue;
            }
        };
        state.current_query = candidate;

        let (RefinementMode::WithExecution, Some(db)) = (state.mode, database) else {
            tracing::info!(round, "refinement succeeded");
            return Ok(state.finish(RefinementStatus::Succeeded, None));
        };

        match execute_once(db, &state.current_query) {
            Ok(ExecutionResult::Success(rows)) => {
                tracing::info!(round, rows = rows.len(), "refined query executed");
                return Ok(state.finish(RefinementStatus::Succeeded, Some(rows)));
            }
            Ok(ExecutionResult::Failure(message)) => {
                tracing::info!(round, error = %message, "refined query rejected by database");
                state.record_error(RefinementError::Execution(message));
            }
            Err(err) => {
                tracing::warn!(round, "database unreachable, stopping refinement: {}", err);
                let status = RefinementStatus::Aborted { reason: err.to_string() };
                return Ok(state.finish(status, None));
            }
        }
    }

    tracing::warn!(iterations = state.iteration_count, "refinement budget exhausted");
    Ok(state.finish(RefinementStatus::Exhausted, None))
}

/// The database execution mode needs; fails when execution has nowhere to run.
pub(crate) fn database_for_mode<L, D>(
    ctx: &AppContext<L, D>,
    mode: RefinementMode,
) -> Result<Option<&D>, AppError>
where
    L: LlmClient,
    D: Database,
{
    match mode {
        RefinementMode::SyntaxOnly => Ok(None),
        RefinementMode::WithExecution => {
            ctx.database().map(Some).ok_or(AppError::DatabaseNotConfigured)
        }
    }
}
