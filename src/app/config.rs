//! Configuration file loading.

use std::fs;
use std::path::Path;

use crate::domain::{AppConfig, AppError, parse_config_content};

/// Config file picked up from the working directory when none is named.
pub const DEFAULT_CONFIG_FILE: &str = "nlsql.toml";

/// Load configuration.
///
/// An explicitly named file must exist. Without one, `nlsql.toml` in `dir` is
/// used when present and defaults apply otherwise.
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<AppConfig, AppError> {
    let path = match explicit {
        Some(path) if !path.is_file() => return Err(AppError::ConfigNotFound(path.to_path_buf())),
        Some(path) => path.to_path_buf(),
        None => {
            let path = dir.join(DEFAULT_CONFIG_FILE);
            if !path.is_file() {
                tracing::debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
                return Ok(AppConfig::default());
            }
            path
        }
    };
    load_config_file(&path)
}

fn load_config_file(path: &Path) -> Result<AppConfig, AppError> {
    let content = fs::read_to_string(path)?;
    let config = parse_config_content(&content)?;
    tracing::debug!(path = %path.display(), "configuration loaded");
    Ok(config)
}
