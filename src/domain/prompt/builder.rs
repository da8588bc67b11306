//! Prompt rendering for SQL generation.
//!
//! Prompts are rendered from embedded templates with strict undefined-variable
//! semantics. Rendering is pure: identical inputs always produce identical text.

use std::sync::OnceLock;

use minijinja::{Environment, UndefinedBehavior, context};

use super::PromptContext;
use crate::domain::{AppError, Schema};

const INITIAL_TEMPLATE: &str = r#"You are an expert SQL query generator. You are given a database schema and a question written in plain language. Use the schema to write the most appropriate SQL query.

Dataset Schema:
{{ schema }}

User Query: "{{ question }}"

Instructions:
1. Use only the tables and columns declared in the schema. Do not assume additional data or relationships exist.
2. If the question is ambiguous or lacks detail, ask for the specific details you need instead of guessing.
3. Make sure the SQL query is syntactically correct and efficient (use indexes, avoid unnecessary joins).
4. Append a `LIMIT 100` clause when the result set could be large, unless the question says otherwise.
5. Do not use `SELECT *`; always name the columns.
6. Check that every table name and column name matches the schema.
"#;

const REFINEMENT_TEMPLATE: &str = r#"You are an expert SQL query generator. Below are a database schema and a previous SQL query that may contain errors.

Dataset Schema:
{{ schema }}
{% if question %}

Original Question: "{{ question }}"
{% endif %}

Previous SQL Query:
{{ previous_query }}
{% if extra_requirement %}

Additional Requirement:
{{ extra_requirement }}
{% endif %}

Instructions:
1. Correct the SQL query against the schema. Make sure every table and column is valid.
2. Make sure the SQL syntax is correct and the query is efficient (use indexes, avoid unnecessary joins).
3. Append a `LIMIT 100` clause when the result set could be large, unless specified otherwise.
4. Do not use `SELECT *`; always name the columns.
{% if prior_error %}

Error in the query:
{{ prior_error }}
Please correct the query accordingly.
{% endif %}
"#;

static ENV: OnceLock<Environment<'static>> = OnceLock::new();

fn environment() -> &'static Environment<'static> {
    ENV.get_or_init(|| {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env
    })
}

/// Render the first prompt for a user question.
pub fn initial_prompt(schema: &Schema, question: &str) -> Result<String, AppError> {
    render(
        "initial",
        INITIAL_TEMPLATE,
        context! { schema => schema.rendered(), question => question.trim() },
    )
}

/// Render a prompt asking the model to correct a previous query.
pub fn refinement_prompt(ctx: &PromptContext<'_>) -> Result<String, AppError> {
    render(
        "refinement",
        REFINEMENT_TEMPLATE,
        context! {
            schema => ctx.schema.rendered(),
            question => ctx.user_question,
            previous_query => ctx.prior_query,
            extra_requirement => ctx.extra_requirement,
            prior_error => ctx.prior_error,
        },
    )
}

/// Render the initial prompt followed by the user's answer to a model question.
pub fn clarification_prompt(
    schema: &Schema,
    question: &str,
    answer: &str,
) -> Result<String, AppError> {
    let base = initial_prompt(schema, question)?;
    Ok(format!("{}\nAdditional User Details: {}\n", base, answer.trim()))
}

fn render(name: &str, template: &str, ctx: minijinja::Value) -> Result<String, AppError> {
    environment()
        .render_str(template, ctx)
        .map_err(|err| AppError::PromptRender(format!("{} template: {}", name, err)))
}
