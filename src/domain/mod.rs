pub mod configuration;
pub mod error;
pub mod execution;
pub mod prompt;
pub mod refinement;
pub mod reply;
pub mod schema;
pub mod session;

pub use configuration::{
    AppConfig, DatabaseConfig, LlmConfig, RefinementConfig, parse_config_content,
};
pub use error::AppError;
pub use execution::{ExecutionResult, QueryRows};
pub use prompt::{PromptContext, clarification_prompt, initial_prompt, refinement_prompt};
pub use refinement::{
    ErrorContextPolicy, RefinementError, RefinementMode, RefinementOutcome, RefinementState,
    RefinementStatus,
};
pub use reply::{ReplyKind, classify_reply, has_failure_marker, normalize_response};
pub use schema::Schema;
pub use session::{Exchange, Session};
