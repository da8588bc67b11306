//! Caller-owned conversation state.
//!
//! A `Session` carries the most recent question and generated query between
//! independent interactions. It is passed explicitly into every operation that
//! reads or updates it; nothing is shared implicitly.

use serde::{Deserialize, Serialize};

use crate::domain::{RefinementError, RefinementOutcome, RefinementStatus, has_failure_marker};

/// Recorded result of one interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    pub question: Option<String>,
    pub query: String,
    pub status: String,
    pub iterations: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<RefinementError>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub last_question: Option<String>,
    #[serde(default)]
    pub last_query: Option<String>,
    /// Question the model asked back, awaiting a user answer.
    #[serde(default)]
    pub pending_clarification: Option<String>,
    #[serde(default)]
    pub exchanges: Vec<Exchange>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a finished refinement into the session.
    ///
    /// The last query is only replaced by a usable candidate: a clarification
    /// request, an empty query, or failure-marked text leaves it untouched.
    pub fn record(&mut self, question: Option<&str>, outcome: &RefinementOutcome) {
        if let Some(question) = question {
            self.last_question = Some(question.to_string());
        }

        match &outcome.status {
            RefinementStatus::NeedsClarification { question } => {
                self.pending_clarification = Some(question.clone());
            }
            _ => {
                self.pending_clarification = None;
                let query = outcome.final_query.trim();
                if !query.is_empty() && !has_failure_marker(query) {
                    self.last_query = Some(query.to_string());
                }
            }
        }

        self.exchanges.push(Exchange {
            question: question.map(str::to_string),
            query: outcome.final_query.clone(),
            status: outcome.status.label().to_string(),
            iterations: outcome.iterations,
            errors: outcome.error_history.clone(),
        });
    }
}
