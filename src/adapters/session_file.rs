//! JSON persistence for caller-owned sessions.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::domain::{AppError, Session};

/// Load a session, starting a fresh one when the file does not exist yet.
pub fn load_session(path: &Path) -> Result<Session, AppError> {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).map_err(|e| AppError::Session {
            path: path.to_path_buf(),
            details: format!("invalid session JSON: {}", e),
        }),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(Session::new()),
        Err(err) => Err(AppError::Io(err)),
    }
}

pub fn save_session(path: &Path, session: &Session) -> Result<(), AppError> {
    let content = serde_json::to_string_pretty(session).map_err(|e| AppError::Session {
        path: path.to_path_buf(),
        details: e.to_string(),
    })?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}
