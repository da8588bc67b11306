use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::ports::{LlmClient, LlmError};

/// LLM fake that replays a fixed script and records every prompt.
#[derive(Clone, Default)]
pub struct ScriptedLlmClient {
    replies: Arc<Mutex<VecDeque<Result<String, LlmError>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedLlmClient {
    pub fn new(replies: Vec<Result<String, LlmError>>) -> Self {
        Self { replies: Arc::new(Mutex::new(replies.into())), prompts: Arc::default() }
    }

    /// Script made only of successful replies.
    pub fn replying<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(replies.into_iter().map(|r| Ok(r.into())).collect())
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl LlmClient for ScriptedLlmClient {
    fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(LlmError::Unavailable { status: None, message: "script exhausted".to_string() })
        })
    }
}
