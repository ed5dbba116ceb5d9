//! Pattern rules: regex matches, substring checks, custom predicates.
//!
//! Unlike the format rules, pattern rules test every string including the
//! empty one; non-string values pass.

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;

use crate::core::{ErrorCode, Rule, RuleError, RuleOutcome, ValidationContext, ValidationError};

// ============================================================================
// REGEX MATCH
// ============================================================================

/// Requires string values to match a regular expression.
#[derive(Debug, Clone)]
pub struct Matches {
    regex: Regex,
}

/// Creates a [`Matches`] rule from a compiled regex.
#[must_use]
pub fn matches(regex: Regex) -> Matches {
    Matches { regex }
}

/// Creates a [`Matches`] rule from a pattern string.
pub fn matches_pattern(pattern: &str) -> Result<Matches, regex::Error> {
    Ok(Matches {
        regex: Regex::new(pattern)?,
    })
}

#[async_trait]
impl Rule for Matches {
    fn name(&self) -> &str {
        "matches"
    }

    async fn apply(
        &self,
        value: &Value,
        _ctx: &ValidationContext,
        _root: &Value,
    ) -> Result<RuleOutcome, RuleError> {
        if let Value::String(s) = value
            && !self.regex.is_match(s)
        {
            return Ok(ValidationError::new(
                ErrorCode::PatternMismatch,
                "Value does not match required pattern",
            )
            .with_param("pattern", self.regex.as_str())
            .into());
        }
        Ok(RuleOutcome::Pass)
    }
}

// ============================================================================
// SUBSTRING CHECKS
// ============================================================================

/// Requires string values to contain a substring.
#[derive(Debug, Clone)]
pub struct Contains {
    substring: String,
}

/// Creates a [`Contains`] rule.
#[must_use]
pub fn contains(substring: impl Into<String>) -> Contains {
    Contains {
        substring: substring.into(),
    }
}

#[async_trait]
impl Rule for Contains {
    fn name(&self) -> &str {
        "contains"
    }

    async fn apply(
        &self,
        value: &Value,
        _ctx: &ValidationContext,
        _root: &Value,
    ) -> Result<RuleOutcome, RuleError> {
        if let Value::String(s) = value
            && !s.contains(&self.substring)
        {
            return Ok(ValidationError::new(
                ErrorCode::PatternMismatch,
                format!("Value must contain \"{}\"", self.substring),
            )
            .into());
        }
        Ok(RuleOutcome::Pass)
    }
}

/// Rejects string values containing any of the listed substrings.
#[derive(Debug, Clone)]
pub struct Forbidden {
    substrings: Vec<String>,
}

/// Creates a [`Forbidden`] rule.
#[must_use]
pub fn forbidden(substrings: impl IntoIterator<Item = impl Into<String>>) -> Forbidden {
    Forbidden {
        substrings: substrings.into_iter().map(Into::into).collect(),
    }
}

#[async_trait]
impl Rule for Forbidden {
    fn name(&self) -> &str {
        "forbidden"
    }

    async fn apply(
        &self,
        value: &Value,
        _ctx: &ValidationContext,
        _root: &Value,
    ) -> Result<RuleOutcome, RuleError> {
        if let Value::String(s) = value
            && let Some(hit) = self.substrings.iter().find(|f| s.contains(f.as_str()))
        {
            return Ok(ValidationError::new(
                ErrorCode::ContainsForbidden,
                "Value contains forbidden content",
            )
            .with_param("forbidden", hit.as_str())
            .into());
        }
        Ok(RuleOutcome::Pass)
    }
}

// ============================================================================
// CUSTOM PREDICATE
// ============================================================================

/// Wraps a caller-supplied predicate over the raw value.
pub struct CustomCheck<F> {
    predicate: F,
    message: String,
}

/// Creates a [`CustomCheck`] rule firing `CUSTOM_ERROR` when the predicate
/// returns false.
#[must_use]
pub fn custom_rule<F>(predicate: F, message: impl Into<String>) -> CustomCheck<F>
where
    F: Fn(&Value) -> bool + Send + Sync,
{
    CustomCheck {
        predicate,
        message: message.into(),
    }
}

#[async_trait]
impl<F> Rule for CustomCheck<F>
where
    F: Fn(&Value) -> bool + Send + Sync,
{
    fn name(&self) -> &str {
        "custom_rule"
    }

    async fn apply(
        &self,
        value: &Value,
        _ctx: &ValidationContext,
        _root: &Value,
    ) -> Result<RuleOutcome, RuleError> {
        if !(self.predicate)(value) {
            return Ok(
                ValidationError::new(ErrorCode::CustomError, self.message.clone()).into(),
            );
        }
        Ok(RuleOutcome::Pass)
    }
}

impl<F> std::fmt::Debug for CustomCheck<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomCheck")
            .field("predicate", &"<function>")
            .field("message", &self.message)
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn run(rule: &impl Rule, value: Value) -> RuleOutcome {
        rule.apply(&value, &ValidationContext::new(), &Value::Null)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_matches() {
        let rule = matches_pattern(r"^\d{3}-\d{4}$").unwrap();
        assert!(run(&rule, json!("123-4567")).await.is_pass());
        assert!(!run(&rule, json!("invalid")).await.is_pass());
        // Pattern rules test the empty string too.
        assert!(!run(&rule, json!("")).await.is_pass());
        assert!(run(&rule, json!(42)).await.is_pass());
    }

    #[tokio::test]
    async fn test_contains() {
        let rule = contains("@");
        assert!(run(&rule, json!("a@b")).await.is_pass());
        let errors = run(&rule, json!("ab")).await.into_errors();
        assert_eq!(errors[0].code, ErrorCode::PatternMismatch);
    }

    #[tokio::test]
    async fn test_forbidden() {
        let rule = forbidden(["<script", "DROP TABLE"]);
        assert!(run(&rule, json!("hello world")).await.is_pass());
        let errors = run(&rule, json!("x <script>alert(1)</script>"))
            .await
            .into_errors();
        assert_eq!(errors[0].code, ErrorCode::ContainsForbidden);
        assert_eq!(errors[0].param("forbidden"), Some(&json!("<script")));
    }

    #[tokio::test]
    async fn test_custom_rule() {
        let rule = custom_rule(|v| v.as_i64().is_some_and(|n| n % 2 == 0), "Must be even");
        assert!(run(&rule, json!(4)).await.is_pass());

        let errors = run(&rule, json!(3)).await.into_errors();
        assert_eq!(errors[0].code, ErrorCode::CustomError);
        assert_eq!(errors[0].message, "Must be even");
    }
}
