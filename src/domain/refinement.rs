//! Refinement loop state and results.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::QueryRows;

/// Default refinement budget.
pub const DEFAULT_MAX_ITERATIONS: u32 = 5;

/// Whether refinement rounds also execute the candidate query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefinementMode {
    #[default]
    SyntaxOnly,
    WithExecution,
}

/// Which errors are shown to the model in the next refinement prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorContextPolicy {
    /// Only the most recent error.
    #[default]
    Latest,
    /// Every error seen so far, oldest first.
    Accumulated,
}

/// One error recorded during refinement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", content = "message", rename_all = "snake_case")]
pub enum RefinementError {
    /// The model reply carried the failure marker.
    Model(String),
    /// The database rejected the candidate query.
    Execution(String),
    /// The LLM adapter returned an unusable payload.
    Adapter(String),
}

impl RefinementError {
    pub fn message(&self) -> &str {
        match self {
            RefinementError::Model(msg)
            | RefinementError::Execution(msg)
            | RefinementError::Adapter(msg) => msg,
        }
    }

    /// True for errors caused by the candidate query rather than the transport.
    pub fn describes_query(&self) -> bool {
        !matches!(self, RefinementError::Adapter(_))
    }
}

impl fmt::Display for RefinementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefinementError::Model(msg) => write!(f, "model: {}", msg),
            RefinementError::Execution(msg) => write!(f, "execution: {}", msg),
            RefinementError::Adapter(msg) => write!(f, "adapter: {}", msg),
        }
    }
}

/// Mutable state owned by a single loop invocation.
#[derive(Debug, Clone)]
pub struct RefinementState {
    pub current_query: String,
    pub last_error: Option<String>,
    pub iteration_count: u32,
    pub mode: RefinementMode,
    history: Vec<RefinementError>,
}

impl RefinementState {
    pub fn new(query: impl Into<String>, mode: RefinementMode) -> Self {
        Self {
            current_query: query.into(),
            last_error: None,
            iteration_count: 0,
            mode,
            history: Vec::new(),
        }
    }

    /// Record an error in the history.
    ///
    /// Only errors about the query itself replace `last_error`; an adapter
    /// failure says nothing about the candidate and is kept out of prompts.
    pub fn record_error(&mut self, error: RefinementError) {
        if error.describes_query() {
            self.last_error = Some(error.message().to_string());
        }
        self.history.push(error);
    }

    pub fn history(&self) -> &[RefinementError] {
        &self.history
    }

    /// Error text for the next prompt under `policy`.
    pub fn error_context(&self, policy: ErrorContextPolicy) -> Option<String> {
        match policy {
            ErrorContextPolicy::Latest => self.last_error.clone(),
            ErrorContextPolicy::Accumulated => Some(
                self.history
                    .iter()
                    .enumerate()
                    .filter(|(_, err)| err.describes_query())
                    .map(|(idx, err)| format!("Attempt {}: {}", idx + 1, err.message()))
                    .collect::<Vec<_>>()
                    .join("\n"),
            )
            .filter(|context| !context.is_empty()),
        }
    }

    pub fn finish(self, status: RefinementStatus, rows: Option<QueryRows>) -> RefinementOutcome {
        RefinementOutcome {
            final_query: self.current_query,
            status,
            iterations: self.iteration_count,
            error_history: self.history,
            rows,
        }
    }
}

/// Terminal state of a refinement loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefinementStatus {
    /// A marker-free reply was produced (and executed, in execution mode).
    Succeeded,
    /// The budget ran out without a confirmed query.
    Exhausted,
    /// The model asked the user a question.
    NeedsClarification { question: String },
    /// An infrastructure failure stopped the loop early.
    Aborted { reason: String },
}

impl RefinementStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RefinementStatus::Succeeded => "succeeded",
            RefinementStatus::Exhausted => "exhausted",
            RefinementStatus::NeedsClarification { .. } => "needs_clarification",
            RefinementStatus::Aborted { .. } => "aborted",
        }
    }
}

/// Result handed back to callers of the refinement loop.
///
/// An exhausted loop still carries its last candidate query; check
/// [`RefinementOutcome::succeeded`] before trusting it.
#[derive(Debug, Clone, PartialEq)]
pub struct RefinementOutcome {
    pub final_query: String,
    pub status: RefinementStatus,
    pub iterations: u32,
    pub error_history: Vec<RefinementError>,
    /// Rows from the confirming execution, when one happened.
    pub rows: Option<QueryRows>,
}

impl RefinementOutcome {
    pub fn succeeded(&self) -> bool {
        self.status == RefinementStatus::Succeeded
    }
}
