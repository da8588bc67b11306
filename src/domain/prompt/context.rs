use crate::domain::Schema;

/// Inputs for a refinement prompt. Constructed fresh for every LLM call.
///
/// Blank optional values are treated as absent so their prompt sections are
/// omitted rather than rendered empty.
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    pub schema: &'a Schema,
    pub prior_query: &'a str,
    pub user_question: Option<&'a str>,
    pub prior_error: Option<&'a str>,
    pub extra_requirement: Option<&'a str>,
}

impl<'a> PromptContext<'a> {
    pub fn new(schema: &'a Schema, prior_query: &'a str) -> Self {
        Self {
            schema,
            prior_query,
            user_question: None,
            prior_error: None,
            extra_requirement: None,
        }
    }

    pub fn with_question(mut self, question: Option<&'a str>) -> Self {
        self.user_question = non_blank(question);
        self
    }

    pub fn with_prior_error(mut self, error: Option<&'a str>) -> Self {
        self.prior_error = non_blank(error);
        self
    }

    pub fn with_extra_requirement(mut self, requirement: Option<&'a str>) -> Self {
        self.extra_requirement = non_blank(requirement);
        self
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_optionals_are_dropped() {
        let schema = Schema::new(json!({}));
        let ctx = PromptContext::new(&schema, "SELECT 1")
            .with_prior_error(Some("   "))
            .with_extra_requirement(Some(""))
            .with_question(Some("how many users?"));

        assert_eq!(ctx.prior_error, None);
        assert_eq!(ctx.extra_requirement, None);
        assert_eq!(ctx.user_question, Some("how many users?"));
    }
}
