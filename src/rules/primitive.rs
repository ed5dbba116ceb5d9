//! Presence, type, and bound rules.
//!
//! `min`, `max`, and `range` branch on the runtime type of the value: a
//! magnitude bound for numbers, a length bound (in chars) for strings. Each
//! branch reports its own error code so consumers can distinguish them.

use async_trait::async_trait;
use serde_json::Value;

use crate::core::{ErrorCode, Rule, RuleError, RuleOutcome, ValidationContext, ValidationError};
use crate::rules::is_absent;

// ============================================================================
// PRESENCE
// ============================================================================

/// Requires a present value: not `null`, not the empty string.
#[derive(Debug, Clone, Copy, Default)]
pub struct Required;

/// Creates a [`Required`] rule.
#[must_use]
pub fn required() -> Required {
    Required
}

#[async_trait]
impl Rule for Required {
    fn name(&self) -> &str {
        "required"
    }

    async fn apply(
        &self,
        value: &Value,
        _ctx: &ValidationContext,
        _root: &Value,
    ) -> Result<RuleOutcome, RuleError> {
        if is_absent(value) {
            return Ok(
                ValidationError::new(ErrorCode::Required, "This field is required").into(),
            );
        }
        Ok(RuleOutcome::Pass)
    }
}

/// Rejects explicit `null` values; anything else passes, including `""`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotNull;

/// Creates a [`NotNull`] rule.
#[must_use]
pub fn not_null() -> NotNull {
    NotNull
}

#[async_trait]
impl Rule for NotNull {
    fn name(&self) -> &str {
        "not_null"
    }

    async fn apply(
        &self,
        value: &Value,
        _ctx: &ValidationContext,
        _root: &Value,
    ) -> Result<RuleOutcome, RuleError> {
        if value.is_null() {
            return Ok(ValidationError::new(ErrorCode::NotNull, "Value cannot be null").into());
        }
        Ok(RuleOutcome::Pass)
    }
}

/// Rejects empty values: `null`, `""`, `[]`, or `{}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotEmpty;

/// Creates a [`NotEmpty`] rule.
#[must_use]
pub fn not_empty() -> NotEmpty {
    NotEmpty
}

#[async_trait]
impl Rule for NotEmpty {
    fn name(&self) -> &str {
        "not_empty"
    }

    async fn apply(
        &self,
        value: &Value,
        _ctx: &ValidationContext,
        _root: &Value,
    ) -> Result<RuleOutcome, RuleError> {
        let empty = match value {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::Object(map) => map.is_empty(),
            _ => false,
        };
        if empty {
            return Ok(ValidationError::new(ErrorCode::NotEmpty, "Value must not be empty").into());
        }
        Ok(RuleOutcome::Pass)
    }
}

// ============================================================================
// TYPE CHECKS
// ============================================================================

/// Requires string-typed values; absent values pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsString;

/// Creates an [`IsString`] rule.
#[must_use]
pub fn is_string() -> IsString {
    IsString
}

#[async_trait]
impl Rule for IsString {
    fn name(&self) -> &str {
        "is_string"
    }

    async fn apply(
        &self,
        value: &Value,
        _ctx: &ValidationContext,
        _root: &Value,
    ) -> Result<RuleOutcome, RuleError> {
        if !value.is_null() && !value.is_string() {
            return Ok(
                ValidationError::new(ErrorCode::InvalidType, "Value must be a string").into(),
            );
        }
        Ok(RuleOutcome::Pass)
    }
}

/// Requires number-typed values; absent values pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsNumber;

/// Creates an [`IsNumber`] rule.
#[must_use]
pub fn is_number() -> IsNumber {
    IsNumber
}

#[async_trait]
impl Rule for IsNumber {
    fn name(&self) -> &str {
        "is_number"
    }

    async fn apply(
        &self,
        value: &Value,
        _ctx: &ValidationContext,
        _root: &Value,
    ) -> Result<RuleOutcome, RuleError> {
        if !value.is_null() && !value.is_number() {
            return Ok(
                ValidationError::new(ErrorCode::InvalidType, "Value must be a number").into(),
            );
        }
        Ok(RuleOutcome::Pass)
    }
}

// ============================================================================
// BOUNDS
// ============================================================================

/// Lower bound: `MIN_VALUE` for numbers, `MIN_LENGTH` for strings.
#[derive(Debug, Clone, Copy)]
pub struct Min {
    min: f64,
}

/// Creates a [`Min`] rule.
#[must_use]
pub fn min(min: impl Into<f64>) -> Min {
    Min { min: min.into() }
}

#[async_trait]
impl Rule for Min {
    fn name(&self) -> &str {
        "min"
    }

    async fn apply(
        &self,
        value: &Value,
        _ctx: &ValidationContext,
        _root: &Value,
    ) -> Result<RuleOutcome, RuleError> {
        match value {
            Value::Number(n) => {
                if n.as_f64().is_some_and(|n| n < self.min) {
                    return Ok(ValidationError::new(
                        ErrorCode::MinValue,
                        format!("Value must be at least {}", self.min),
                    )
                    .with_param("min", self.min)
                    .into());
                }
            }
            Value::String(s) => {
                if (s.chars().count() as f64) < self.min {
                    return Ok(ValidationError::new(
                        ErrorCode::MinLength,
                        format!("Length must be at least {}", self.min),
                    )
                    .with_param("min", self.min)
                    .into());
                }
            }
            _ => {}
        }
        Ok(RuleOutcome::Pass)
    }
}

/// Upper bound: `MAX_VALUE` for numbers, `MAX_LENGTH` for strings.
#[derive(Debug, Clone, Copy)]
pub struct Max {
    max: f64,
}

/// Creates a [`Max`] rule.
#[must_use]
pub fn max(max: impl Into<f64>) -> Max {
    Max { max: max.into() }
}

#[async_trait]
impl Rule for Max {
    fn name(&self) -> &str {
        "max"
    }

    async fn apply(
        &self,
        value: &Value,
        _ctx: &ValidationContext,
        _root: &Value,
    ) -> Result<RuleOutcome, RuleError> {
        match value {
            Value::Number(n) => {
                if n.as_f64().is_some_and(|n| n > self.max) {
                    return Ok(ValidationError::new(
                        ErrorCode::MaxValue,
                        format!("Value must be at most {}", self.max),
                    )
                    .with_param("max", self.max)
                    .into());
                }
            }
            Value::String(s) => {
                if (s.chars().count() as f64) > self.max {
                    return Ok(ValidationError::new(
                        ErrorCode::MaxLength,
                        format!("Length must be at most {}", self.max),
                    )
                    .with_param("max", self.max)
                    .into());
                }
            }
            _ => {}
        }
        Ok(RuleOutcome::Pass)
    }
}

/// Inclusive two-sided bound: `RANGE` for numbers, `LENGTH_RANGE` for strings.
#[derive(Debug, Clone, Copy)]
pub struct Range {
    min: f64,
    max: f64,
}

/// Creates a [`Range`] rule.
#[must_use]
pub fn range(min: impl Into<f64>, max: impl Into<f64>) -> Range {
    Range {
        min: min.into(),
        max: max.into(),
    }
}

#[async_trait]
impl Rule for Range {
    fn name(&self) -> &str {
        "range"
    }

    async fn apply(
        &self,
        value: &Value,
        _ctx: &ValidationContext,
        _root: &Value,
    ) -> Result<RuleOutcome, RuleError> {
        match value {
            Value::Number(n) => {
                if n.as_f64().is_some_and(|n| n < self.min || n > self.max) {
                    return Ok(ValidationError::new(
                        ErrorCode::Range,
                        format!("Value must be between {} and {}", self.min, self.max),
                    )
                    .with_param("min", self.min)
                    .with_param("max", self.max)
                    .into());
                }
            }
            Value::String(s) => {
                let len = s.chars().count() as f64;
                if len < self.min || len > self.max {
                    return Ok(ValidationError::new(
                        ErrorCode::LengthRange,
                        format!("Length must be between {} and {}", self.min, self.max),
                    )
                    .with_param("min", self.min)
                    .with_param("max", self.max)
                    .into());
                }
            }
            _ => {}
        }
        Ok(RuleOutcome::Pass)
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
    async fn test_required() {
        let rule = required();
        assert!(!run(&rule, Value::Null).await.is_pass());
        assert!(!run(&rule, json!("")).await.is_pass());
        assert!(run(&rule, json!("x")).await.is_pass());
        assert!(run(&rule, json!(0)).await.is_pass());
    }

    #[tokio::test]
    async fn test_not_null_allows_empty_string() {
        let rule = not_null();
        assert!(!run(&rule, Value::Null).await.is_pass());
        assert!(run(&rule, json!("")).await.is_pass());
    }

    #[tokio::test]
    async fn test_not_empty() {
        let rule = not_empty();
        assert!(!run(&rule, Value::Null).await.is_pass());
        assert!(!run(&rule, json!("")).await.is_pass());
        assert!(!run(&rule, json!([])).await.is_pass());
        assert!(!run(&rule, json!({})).await.is_pass());
        assert!(run(&rule, json!(" ")).await.is_pass());
        assert!(run(&rule, json!([1])).await.is_pass());
    }

    #[tokio::test]
    async fn test_type_checks_skip_absent() {
        assert!(run(&is_string(), Value::Null).await.is_pass());
        assert!(run(&is_number(), Value::Null).await.is_pass());

        assert!(!run(&is_string(), json!(5)).await.is_pass());
        assert!(!run(&is_number(), json!("5")).await.is_pass());
    }

    #[tokio::test]
    async fn test_min_branches_on_type() {
        let rule = min(3);

        let numeric = run(&rule, json!(2)).await.into_errors();
        assert_eq!(numeric[0].code, ErrorCode::MinValue);

        let textual = run(&rule, json!("ab")).await.into_errors();
        assert_eq!(textual[0].code, ErrorCode::MinLength);

        assert!(run(&rule, json!(3)).await.is_pass());
        assert!(run(&rule, json!("abc")).await.is_pass());
        assert!(run(&rule, json!(true)).await.is_pass());
    }

    #[tokio::test]
    async fn test_max_branches_on_type() {
        let rule = max(2);

        let numeric = run(&rule, json!(3)).await.into_errors();
        assert_eq!(numeric[0].code, ErrorCode::MaxValue);

        let textual = run(&rule, json!("abc")).await.into_errors();
        assert_eq!(textual[0].code, ErrorCode::MaxLength);

        assert!(run(&rule, json!(2)).await.is_pass());
        assert!(run(&rule, json!("ab")).await.is_pass());
    }

    #[tokio::test]
    async fn test_range_branches_on_type() {
        let rule = range(2, 4);

        let numeric = run(&rule, json!(5)).await.into_errors();
        assert_eq!(numeric[0].code, ErrorCode::Range);

        let textual = run(&rule, json!("a")).await.into_errors();
        assert_eq!(textual[0].code, ErrorCode::LengthRange);

        assert!(run(&rule, json!(2)).await.is_pass());
        assert!(run(&rule, json!(4)).await.is_pass());
        assert!(run(&rule, json!("abc")).await.is_pass());
    }

    #[tokio::test]
    async fn test_min_counts_chars_not_bytes() {
        let rule = min(3);
        // Two chars, eight bytes.
        assert!(!run(&rule, json!("\u{1f44b}\u{1f30d}")).await.is_pass());
    }
}
