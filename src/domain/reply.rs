//! Normalization and classification of raw model replies.

/// Substring that marks a reply as a failure rather than a usable query.
pub const FAILURE_MARKER: &str = "error";

const FENCE: &str = "```";

const SQL_LEADING_KEYWORDS: &[&str] = &[
    "SELECT", "WITH", "INSERT", "UPDATE", "DELETE", "CREATE", "ALTER", "DROP", "PRAGMA", "EXPLAIN",
    "VALUES", "REPLACE",
];

/// What a model reply turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyKind {
    /// A candidate SQL query.
    Sql(String),
    /// The reply carries the failure marker.
    FailureMarked(String),
    /// The model asked the user a question instead of answering.
    Clarification(String),
    /// Nothing left after normalization.
    Empty,
}

impl ReplyKind {
    /// The normalized reply text.
    pub fn text(&self) -> &str {
        match self {
            ReplyKind::Sql(text)
            | ReplyKind::FailureMarked(text)
            | ReplyKind::Clarification(text) => text,
            ReplyKind::Empty => "",
        }
    }
}

/// Strip code fences wrapping a reply and trim surrounding whitespace.
///
/// Only a reply that both opens with a ```` ```sql ```` (or bare ```` ``` ````)
/// fence and ends with a closing fence is unwrapped. Nested wrappers are
/// removed until none remain, so normalizing twice is a no-op.
pub fn normalize_response(raw: &str) -> String {
    let mut current = raw.trim();
    while let Some(body) = strip_fence(current) {
        current = body.trim();
    }
    current.to_string()
}

fn strip_fence(text: &str) -> Option<&str> {
    if text.len() < FENCE.len() * 2 || !text.starts_with(FENCE) || !text.ends_with(FENCE) {
        return None;
    }
    let inner = &text[FENCE.len()..text.len() - FENCE.len()];

    if inner.get(..3).is_some_and(|tag| tag.eq_ignore_ascii_case("sql")) {
        let rest = &inner[3..];
        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            return Some(rest);
        }
        return None;
    }

    if inner.is_empty() || inner.starts_with(char::is_whitespace) { Some(inner) } else { None }
}

/// Whether `text` carries the failure marker (case-insensitive).
pub fn has_failure_marker(text: &str) -> bool {
    text.to_lowercase().contains(FAILURE_MARKER)
}

/// Whether `text` reads as a question for the user rather than a query.
///
/// SQL may legitimately contain `?` placeholders, so text opening with a SQL
/// keyword is never treated as a question.
pub fn is_clarification_request(text: &str) -> bool {
    text.contains('?') && !starts_with_sql_keyword(text)
}

fn starts_with_sql_keyword(text: &str) -> bool {
    let first_word: String = text
        .trim_start_matches(|c: char| !c.is_ascii_alphabetic())
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    SQL_LEADING_KEYWORDS.iter().any(|kw| kw.eq_ignore_ascii_case(&first_word))
}

/// Normalize a raw reply and decide what it is.
///
/// The failure marker wins over every other signal.
pub fn classify_reply(raw: &str) -> ReplyKind {
    let text = normalize_response(raw);
    if text.is_empty() {
        ReplyKind::Empty
    } else if has_failure_marker(&text) {
        ReplyKind::FailureMarked(text)
    } else if is_clarification_request(&text) {
        ReplyKind::Clarification(text)
    } else {
        ReplyKind::Sql(text)
    }
}
