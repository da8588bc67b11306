//! Generative Language API client implementation using reqwest.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::{AppError, LlmConfig};
use crate::ports::{LlmClient, LlmError};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

const X_GOOG_API_KEY: &str = "x-goog-api-key";

/// HTTP client for the `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    api_key: String,
    endpoint: Url,
    client: Client,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl GeminiClient {
    /// Create a new HTTP client with the given API key and configuration.
    pub fn new(api_key: String, config: &LlmConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { api_key, endpoint: endpoint_for(config)?, client })
    }

    /// Create from the `GOOGLE_API_KEY` environment variable.
    pub fn from_env_with_config(config: &LlmConfig) -> Result<Self, AppError> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                AppError::Configuration(format!("{} environment variable not set", API_KEY_ENV))
            })?;

        Self::new(api_key, config)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

fn endpoint_for(config: &LlmConfig) -> Result<Url, AppError> {
    let raw = format!(
        "{}/models/{}:generateContent",
        config.api_url.as_str().trim_end_matches('/'),
        config.model.trim()
    );
    Url::parse(&raw)
        .map_err(|e| AppError::InvalidConfig(format!("Invalid LLM endpoint '{}': {}", raw, e)))
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

impl LlmClient for GeminiClient {
    #[tracing::instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let request = GenerateContentRequest {
            contents: [Content { role: "user", parts: [RequestPart { text: prompt }] }],
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(X_GOOG_API_KEY, &self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .map_err(|e| {
                let message = if e.is_timeout() {
                    format!("request timed out: {}", e)
                } else {
                    format!("HTTP request failed: {}", e)
                };
                LlmError::Unavailable { status: None, message }
            })?;

        let status = response.status();

        if status.is_success() {
            let body: GenerateContentResponse = response
                .json()
                .map_err(|e| LlmError::MalformedResponse(format!("invalid JSON: {}", e)))?;
            extract_text(body)
        } else if status.as_u16() == 429 {
            Err(LlmError::RateLimited)
        } else if status.as_u16() == 408 || status.is_server_error() {
            Err(LlmError::Unavailable {
                status: Some(status.as_u16()),
                message: "Server error".to_string(),
            })
        } else {
            let text = response.text().unwrap_or_else(|_| "Unknown error".to_string());
            Err(LlmError::Rejected { status: Some(status.as_u16()), message: error_message(&text) })
        }
    }
}

fn extract_text(body: GenerateContentResponse) -> Result<String, LlmError> {
    let Some(candidate) = body.candidates.into_iter().next() else {
        if let Some(reason) = body.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(LlmError::Rejected {
                status: None,
                message: format!("prompt blocked: {}", reason),
            });
        }
        return Err(LlmError::MalformedResponse("response contained no candidates".to_string()));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".to_string());
        return Err(LlmError::MalformedResponse(format!(
            "candidate contained no text (finish reason: {})",
            reason
        )));
    }

    Ok(text.trim().to_string())
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .ok()
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| body.trim().to_string())
}
