//! Database schema document forwarded into every prompt.

use serde_json::Value;

/// An opaque schema description (tables, columns, types, keys).
///
/// The core never inspects the structure; it only renders it into prompts.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    document: Value,
    rendered: String,
}

impl Schema {
    pub fn new(document: Value) -> Self {
        let rendered =
            serde_json::to_string_pretty(&document).unwrap_or_else(|_| document.to_string());
        Self { document, rendered }
    }

    /// The parsed document.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Pretty-printed JSON used as the prompt's schema section.
    pub fn rendered(&self) -> &str {
        &self.rendered
    }
}
