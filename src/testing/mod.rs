mod scripted_database;
mod scripted_llm_client;

pub use scripted_database::ScriptedDatabase;
pub use scripted_llm_client::ScriptedLlmClient;
