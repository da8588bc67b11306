//! Configuration domain models loaded from `nlsql.toml`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::refinement::DEFAULT_MAX_ITERATIONS;
use crate::domain::{AppError, ErrorContextPolicy};

/// Upper bound for the refinement budget.
const MAX_ITERATIONS_LIMIT: u32 = 50;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// LLM service configuration.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Refinement loop configuration.
    #[serde(default)]
    pub refinement: RefinementConfig,
    /// Database used for execution.
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        self.llm.validate()?;
        self.refinement.validate()?;
        self.database.validate()?;
        Ok(())
    }
}

/// Generative Language API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    /// API base URL; requests go to `{api_url}/models/{model}:generateContent`.
    #[serde(default = "default_api_url")]
    pub api_url: Url,
    /// Model name.
    #[serde(default = "default_model")]
    pub model: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Maximum attempts per generation call.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base delay between retries in milliseconds.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            model: default_model(),
            timeout_secs: default_timeout(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl LlmConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.model.trim().is_empty() {
            return Err(AppError::InvalidConfig("llm.model must not be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::InvalidConfig(
                "llm.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.max_retries == 0 {
            return Err(AppError::InvalidConfig(
                "llm.max_retries must be greater than 0".to_string(),
            ));
        }
        if self.retry_delay_ms == 0 {
            return Err(AppError::InvalidConfig(
                "llm.retry_delay_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_api_url() -> Url {
    Url::parse("https://generativelanguage.googleapis.com/v1beta")
        .expect("Default API URL must be valid")
}

fn default_model() -> String {
    "gemini-pro".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    500
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RefinementConfig {
    /// Maximum refinement rounds per loop.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    /// Which errors the next prompt shows.
    #[serde(default)]
    pub error_context: ErrorContextPolicy,
}

impl Default for RefinementConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            error_context: ErrorContextPolicy::default(),
        }
    }
}

impl RefinementConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.max_iterations == 0 || self.max_iterations > MAX_ITERATIONS_LIMIT {
            return Err(AppError::InvalidConfig(format!(
                "refinement.max_iterations must be between 1 and {}",
                MAX_ITERATIONS_LIMIT
            )));
        }
        Ok(())
    }
}

fn default_max_iterations() -> u32 {
    DEFAULT_MAX_ITERATIONS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// SQLite database file.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// How long a connection waits on a locked database.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: None, busy_timeout_ms: default_busy_timeout_ms() }
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.path.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
            return Err(AppError::InvalidConfig("database.path must not be empty".to_string()));
        }
        Ok(())
    }
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

/// Parse configuration from string content.
pub fn parse_config_content(content: &str) -> Result<AppConfig, AppError> {
    let config: AppConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}
