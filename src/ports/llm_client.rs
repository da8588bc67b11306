//! LLM service port definition.

use thiserror::Error;

/// Failure reported by an LLM adapter.
///
/// These are infrastructure failures, distinct from a model reply that merely
/// describes a problem with the SQL (see [`crate::domain::ReplyKind`]).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LlmError {
    /// Service unreachable, timed out, or returned a server error.
    #[error("LLM service unavailable{}: {message}", status_suffix(*.status))]
    Unavailable { status: Option<u16>, message: String },

    /// Quota or rate limit exceeded.
    #[error("LLM service rate limited the request (429)")]
    RateLimited,

    /// Request refused (bad key, blocked prompt, unknown model).
    #[error("LLM service rejected the request{}: {message}", status_suffix(*.status))]
    Rejected { status: Option<u16>, message: String },

    /// The service answered but the payload had no usable text.
    #[error("Malformed LLM response: {0}")]
    MalformedResponse(String),
}

impl LlmError {
    /// Whether the failure is an infrastructure outage that should stop a refinement loop.
    pub fn is_outage(&self) -> bool {
        !matches!(self, LlmError::MalformedResponse(_))
    }
}

fn status_suffix(status: Option<u16>) -> String {
    status.map(|code| format!(" ({})", code)).unwrap_or_default()
}

/// Port for text generation.
///
/// Every call is a fresh, stateless request; conversational context is carried
/// entirely by the prompt text.
pub trait LlmClient {
    /// Generate raw model text for `prompt`.
    fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

impl<T: LlmClient + ?Sized> LlmClient for Box<T> {
    fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        (**self).generate(prompt)
    }
}

impl<T: LlmClient + ?Sized> LlmClient for &T {
    fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        (**self).generate(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_response_is_not_an_outage() {
        assert!(!LlmError::MalformedResponse("no candidates".into()).is_outage());
        assert!(LlmError::RateLimited.is_outage());
        assert!(LlmError::Unavailable { status: None, message: "refused".into() }.is_outage());
    }

    #[test]
    fn display_includes_status_when_known() {
        let err = LlmError::Unavailable { status: Some(503), message: "Server error".into() };
        assert_eq!(err.to_string(), "LLM service unavailable (503): Server error");

        let err = LlmError::Rejected { status: None, message: "prompt blocked".into() };
        assert_eq!(err.to_string(), "LLM service rejected the request: prompt blocked");
    }
}
