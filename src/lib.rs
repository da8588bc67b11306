//! nlsql: turn natural-language questions into SQL and refine the query with an LLM.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

pub use app::api::{
    AskOutcome, ExecutionResult, QueryRows, RefinementMode, RefinementOutcome, RefinementStatus,
    Settings, ask, clarify, execute, generate, prompt_preview, refine,
};
pub use domain::AppError;
