mod builder;
mod context;

pub use builder::{clarification_prompt, initial_prompt, refinement_prompt};
pub use context::PromptContext;
