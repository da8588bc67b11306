//! Schema document loading from JSON or YAML files.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde_json::Value;

use crate::domain::{AppError, Schema};

/// Load a schema file. `.yml`/`.yaml` files are read as YAML, everything else as JSON.
pub fn load_schema(path: &Path) -> Result<Schema, AppError> {
    let content = fs::read_to_string(path).map_err(|err| {
        if err.kind() == ErrorKind::NotFound {
            AppError::SchemaNotFound(path.to_path_buf())
        } else {
            AppError::Io(err)
        }
    })?;

    let parse_error =
        |details: String| AppError::SchemaParse { path: path.to_path_buf(), details };

    let document: Value = match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml") => {
            serde_yaml::from_str(&content).map_err(|e| parse_error(e.to_string()))?
        }
        _ => serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))?,
    };

    Ok(Schema::new(document))
}
