pub mod llm_client;
pub mod schema_file;
pub mod session_file;
pub mod sqlite_database;

pub use llm_client::{GeminiClient, RetryPolicy, RetryingLlmClient};
pub use sqlite_database::SqliteDatabase;
