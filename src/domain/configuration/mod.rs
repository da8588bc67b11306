pub mod app_config;

pub use app_config::{AppConfig, DatabaseConfig, LlmConfig, RefinementConfig, parse_config_content};
