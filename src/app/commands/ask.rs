use crate::app::AppContext;
use crate::app::commands::generate::validate_question;
use crate::app::commands::refine::{self, RefineRequest, database_for_mode};
use crate::domain::{
    AppError, RefinementMode, RefinementOutcome, RefinementState, RefinementStatus, ReplyKind,
    Schema, Session, classify_reply, clarification_prompt, initial_prompt,
};
use crate::ports::{Database, LlmClient};

/// Result of a full question-to-query interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct AskOutcome {
    /// First candidate produced from the question, when the model wrote SQL.
    pub initial_query: Option<String>,
    pub outcome: RefinementOutcome,
}

/// Answer `question`: generate a first candidate, then refine it.
///
/// The session is updated with the question and the final outcome.
pub fn execute<L, D>(
    ctx: &AppContext<L, D>,
    session: &mut Session,
    schema: &Schema,
    question: &str,
    mode: RefinementMode,
) -> Result<AskOutcome, AppError>
where
    L: LlmClient,
    D: Database,
{
    let question = validate_question(question)?;
    database_for_mode(ctx, mode)?;
    let prompt = initial_prompt(schema, question)?;
    run(ctx, session, schema, question, &prompt, mode)
}

/// Retry `question` with the user's answer to a clarification request.
pub fn clarify<L, D>(
    ctx: &AppContext<L, D>,
    session: &mut Session,
    schema: &Schema,
    question: &str,
    answer: &str,
    mode: RefinementMode,
) -> Result<AskOutcome, AppError>
where
    L: LlmClient,
    D: Database,
{
    let question = validate_question(question)?;
    if answer.trim().is_empty() {
        return Err(AppError::Validation("Please enter an answer".to_string()));
    }
    database_for_mode(ctx, mode)?;
    let prompt = clarification_prompt(schema, question, answer)?;
    run(ctx, session, schema, question, &prompt, mode)
}

fn run<L, D>(
    ctx: &AppContext<L, D>,
    session: &mut Session,
    schema: &Schema,
    question: &str,
    prompt: &str,
    mode: RefinementMode,
) -> Result<AskOutcome, AppError>
where
    L: LlmClient,
    D: Database,
{
    let reply = ctx.llm().generate(prompt)?;

    let (initial_query, outcome) = match classify_reply(&reply) {
        ReplyKind::Sql(sql) => {
            tracing::debug!("initial candidate generated");
            let request = RefineRequest::new(schema, &sql, mode).with_question(Some(question));
            let outcome = refine::execute(ctx, request)?;
            (Some(sql), outcome)
        }
        ReplyKind::Clarification(asked) => {
            let status = RefinementStatus::NeedsClarification { question: asked };
            (None, RefinementState::new(String::new(), mode).finish(status, None))
        }
        ReplyKind::FailureMarked(text) => return Err(AppError::ModelReportedError(text)),
        ReplyKind::Empty => {
            return Err(AppError::ModelReportedError("the model returned an empty reply".into()));
        }
    };

    session.record(Some(question), &outcome);
    Ok(AskOutcome { initial_query, outcome })
}
