mod database;
mod llm_client;

pub use database::{Database, DatabaseError};
pub use llm_client::{LlmClient, LlmError};
