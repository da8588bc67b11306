use crate::domain::RefinementConfig;
use crate::ports::{Database, LlmClient};

/// Application context holding dependencies for command execution.
pub struct AppContext<L: LlmClient, D: Database> {
    llm: L,
    database: Option<D>,
    refinement: RefinementConfig,
}

impl<L: LlmClient, D: Database> AppContext<L, D> {
    /// Create a new application context.
    pub fn new(llm: L, database: Option<D>, refinement: RefinementConfig) -> Self {
        Self { llm, database, refinement }
    }

    /// Get a reference to the LLM client.
    pub fn llm(&self) -> &L {
        &self.llm
    }

    /// Get the database used for execution, when one is configured.
    pub fn database(&self) -> Option<&D> {
        self.database.as_ref()
    }

    pub fn refinement(&self) -> &RefinementConfig {
        &self.refinement
    }
}
