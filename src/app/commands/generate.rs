use crate::app::AppContext;
use crate::domain::{AppError, ReplyKind, Schema, classify_reply, initial_prompt};
use crate::ports::{Database, LlmClient};

/// Generate a first SQL candidate for `question`.
///
/// The normalized reply is returned as is, including a clarifying question.
/// A failure-marked or empty reply is an error.
pub fn execute<L, D>(
    ctx: &AppContext<L, D>,
    schema: &Schema,
    question: &str,
) -> Result<String, AppError>
where
    L: LlmClient,
    D: Database,
{
    let question = validate_question(question)?;
    let prompt = initial_prompt(schema, question)?;
    tracing::debug!(chars = prompt.len(), "initial prompt built");

    let reply = ctx.llm().generate(&prompt)?;
    match classify_reply(&reply) {
        ReplyKind::FailureMarked(text) => Err(AppError::ModelReportedError(text)),
        ReplyKind::Empty => {
            Err(AppError::ModelReportedError("the model returned an empty reply".to_string()))
        }
        kind => Ok(kind.text().to_string()),
    }
}

/// Reject blank questions before any prompt is built.
pub(crate) fn validate_question(question: &str) -> Result<&str, AppError> {
    let question = question.trim();
    if question.is_empty() {
        return Err(AppError::EmptyQuestion);
    }
    Ok(question)
}
