//! Field validator: an ordered rule pipeline bound to one field name.
//!
//! Rules run strictly sequentially, in append order, and the run never
//! short-circuits: every rule sees the value regardless of prior failures,
//! so a caller gets all applicable errors at once. Built-in rules guard
//! against absent values themselves.

use std::borrow::Cow;
use std::future::Future;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, trace};

use crate::core::context::ValidationContext;
use crate::core::error::{ErrorCode, ValidationError};
use crate::core::result::ValidationResult;
use crate::core::rule::{AsyncRule, FallibleRule, Rule, RuleError, RuleOutcome, SimpleRule};
use crate::rules;
use crate::rules::is_absent;

/// An ordered collection of rules bound to one field name.
///
/// Build with the chaining methods, then call [`Validator::run`] any number
/// of times. Appending is a build-time concern: the builder methods consume
/// `self`, so a shared validator can only be run, never grown concurrently.
///
/// # Examples
///
/// ```
/// use fieldcheck::prelude::*;
/// use serde_json::json;
///
/// # async fn demo() {
/// let email = Validator::new("email").required().email();
///
/// let result = email.run(&json!("user@example.com")).await;
/// assert!(result.is_valid());
/// # }
/// ```
pub struct Validator {
    field: Cow<'static, str>,
    rules: Vec<Box<dyn Rule>>,
}

impl Validator {
    /// Creates a validator bound to `field`.
    #[must_use]
    pub fn new(field: impl Into<Cow<'static, str>>) -> Self {
        Self {
            field: field.into(),
            rules: Vec::new(),
        }
    }

    /// The field name errors are attributed to.
    #[must_use]
    pub fn field_name(&self) -> &str {
        &self.field
    }

    /// Number of rules attached so far.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    // --- Core API ---

    /// Appends an arbitrary rule to the end of the pipeline.
    #[must_use = "builder methods must be chained or built"]
    pub fn add_rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Appends a custom sync check.
    #[must_use = "builder methods must be chained or built"]
    pub fn custom<F>(self, check: F) -> Self
    where
        F: Fn(&Value, &ValidationContext, &Value) -> RuleOutcome + Send + Sync + 'static,
    {
        self.add_rule(SimpleRule::new("custom", check))
    }

    /// Appends a custom sync check that may itself fail to run.
    #[must_use = "builder methods must be chained or built"]
    pub fn try_custom<F>(self, check: F) -> Self
    where
        F: Fn(&Value, &ValidationContext, &Value) -> Result<RuleOutcome, RuleError>
            + Send
            + Sync
            + 'static,
    {
        self.add_rule(FallibleRule::new("custom", check))
    }

    /// Appends a custom async check. The closure receives owned clones of
    /// the value, context, and root record.
    #[must_use = "builder methods must be chained or built"]
    pub fn custom_async<F, Fut>(self, check: F) -> Self
    where
        F: Fn(Value, ValidationContext, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<RuleOutcome, RuleError>> + Send + 'static,
    {
        self.add_rule(AsyncRule::new("custom", check))
    }

    // --- Fluent API: presence and primitives ---

    /// Requires a present value.
    #[must_use = "builder methods must be chained or built"]
    pub fn required(self) -> Self {
        self.add_rule(rules::required())
    }

    /// Rejects explicit `null`.
    #[must_use = "builder methods must be chained or built"]
    pub fn not_null(self) -> Self {
        self.add_rule(rules::not_null())
    }

    /// Rejects empty strings, arrays, and objects.
    #[must_use = "builder methods must be chained or built"]
    pub fn not_empty(self) -> Self {
        self.add_rule(rules::not_empty())
    }

    /// Requires string-typed values.
    #[must_use = "builder methods must be chained or built"]
    pub fn string(self) -> Self {
        self.add_rule(rules::is_string())
    }

    /// Requires number-typed values.
    #[must_use = "builder methods must be chained or built"]
    pub fn number(self) -> Self {
        self.add_rule(rules::is_number())
    }

    /// Lower bound on numbers (magnitude) and strings (length).
    #[must_use = "builder methods must be chained or built"]
    pub fn min(self, min: impl Into<f64>) -> Self {
        self.add_rule(rules::min(min))
    }

    /// Upper bound on numbers (magnitude) and strings (length).
    #[must_use = "builder methods must be chained or built"]
    pub fn max(self, max: impl Into<f64>) -> Self {
        self.add_rule(rules::max(max))
    }

    /// Inclusive two-sided bound on numbers and string lengths.
    #[must_use = "builder methods must be chained or built"]
    pub fn range(self, min: impl Into<f64>, max: impl Into<f64>) -> Self {
        self.add_rule(rules::range(min, max))
    }

    // --- Fluent API: formats ---

    /// Email address format.
    #[must_use = "builder methods must be chained or built"]
    pub fn email(self) -> Self {
        self.add_rule(rules::email())
    }

    /// URL format.
    #[must_use = "builder methods must be chained or built"]
    pub fn url(self) -> Self {
        self.add_rule(rules::url())
    }

    /// Hyphenated UUID format.
    #[must_use = "builder methods must be chained or built"]
    pub fn uuid(self) -> Self {
        self.add_rule(rules::uuid())
    }

    /// Phone number format.
    #[must_use = "builder methods must be chained or built"]
    pub fn phone(self) -> Self {
        self.add_rule(rules::phone())
    }

    /// IP address format, v4 or v6.
    #[must_use = "builder methods must be chained or built"]
    pub fn ip(self) -> Self {
        self.add_rule(rules::ip())
    }

    /// Parseable date.
    #[must_use = "builder methods must be chained or built"]
    pub fn date(self) -> Self {
        self.add_rule(rules::date())
    }

    /// Date strictly in the past.
    #[must_use = "builder methods must be chained or built"]
    pub fn past(self) -> Self {
        self.add_rule(rules::past())
    }

    /// Date strictly in the future.
    #[must_use = "builder methods must be chained or built"]
    pub fn future(self) -> Self {
        self.add_rule(rules::future())
    }

    // --- Fluent API: patterns ---

    /// String must match a compiled regex.
    #[must_use = "builder methods must be chained or built"]
    pub fn matches(self, regex: regex::Regex) -> Self {
        self.add_rule(rules::matches(regex))
    }

    /// String must contain a substring.
    #[must_use = "builder methods must be chained or built"]
    pub fn contains(self, substring: impl Into<String>) -> Self {
        self.add_rule(rules::contains(substring))
    }

    /// String must not contain any of the listed substrings.
    #[must_use = "builder methods must be chained or built"]
    pub fn forbidden(self, substrings: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.add_rule(rules::forbidden(substrings))
    }

    // --- Fluent API: cross-field and business ---

    /// Value must equal `other` in the root record.
    #[must_use = "builder methods must be chained or built"]
    pub fn match_field(self, other: impl Into<String>) -> Self {
        self.add_rule(rules::matches_field(other))
    }

    /// Value becomes mandatory when `other` holds `expected`.
    #[must_use = "builder methods must be chained or built"]
    pub fn required_if(self, other: impl Into<String>, expected: impl Into<Value>) -> Self {
        self.add_rule(rules::required_if(other, expected))
    }

    /// Email domain must be on the allow-list.
    #[must_use = "builder methods must be chained or built"]
    pub fn allowed_domains(self, domains: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.add_rule(rules::allowed_domains(domains))
    }

    /// Restricted to callers with the `admin` role.
    #[must_use = "builder methods must be chained or built"]
    pub fn admin_only(self) -> Self {
        self.add_rule(rules::admin_only())
    }

    // --- Fluent API: async and context-aware helpers ---

    /// Uniqueness check backed by a caller-supplied async predicate, e.g. a
    /// store lookup. Absent values pass without invoking the predicate; a
    /// predicate error surfaces as a `CUSTOM_ERROR` like any rule failure.
    #[must_use = "builder methods must be chained or built"]
    pub fn unique<F, Fut>(self, check: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<bool, RuleError>> + Send + 'static,
    {
        self.add_rule(Unique { check })
    }

    /// Generic context-aware check over `(context, value)`.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_context<F>(self, check: F, message: impl Into<Cow<'static, str>>) -> Self
    where
        F: Fn(&ValidationContext, &Value) -> bool + Send + Sync + 'static,
    {
        self.add_rule(WithContext {
            check,
            message: message.into(),
        })
    }

    // --- Execution ---

    /// Runs all rules against `value` with an empty context and no root
    /// record.
    pub async fn run(&self, value: &Value) -> ValidationResult {
        self.run_with(value, &ValidationContext::default(), &Value::Null)
            .await
    }

    /// Runs all rules against `value`.
    ///
    /// Rules execute strictly sequentially in append order; a rule that
    /// fails to run is converted into a single `CUSTOM_ERROR` finding and
    /// the remaining rules still execute. Errors a rule left unattributed
    /// acquire this validator's field name.
    pub async fn run_with(
        &self,
        value: &Value,
        ctx: &ValidationContext,
        root: &Value,
    ) -> ValidationResult {
        let mut errors = Vec::new();

        for rule in &self.rules {
            match rule.apply(value, ctx, root).await {
                Ok(RuleOutcome::Pass) => {}
                Ok(RuleOutcome::Fail(error)) => errors.push(self.attribute(error)),
                Ok(RuleOutcome::FailAll(batch)) => {
                    errors.extend(batch.into_iter().map(|e| self.attribute(e)));
                }
                Err(source) => {
                    debug!(
                        rule = rule.name(),
                        field = %self.field,
                        error = %source,
                        "rule execution failed",
                    );
                    errors.push(
                        ValidationError::new(
                            ErrorCode::CustomError,
                            format!("Validation execution failed: {source}"),
                        )
                        .with_field(self.field.clone()),
                    );
                }
            }
        }

        trace!(field = %self.field, errors = errors.len(), "field validation finished");
        ValidationResult::from_errors(errors)
    }

    fn attribute(&self, mut error: ValidationError) -> ValidationError {
        if error.field.is_none() {
            error.field = Some(self.field.clone());
        }
        error
    }
}

impl Default for Validator {
    /// A validator with the default field name `"field"`.
    fn default() -> Self {
        Self::new("field")
    }
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("field", &self.field)
            .field("rules", &self.rules.iter().map(|r| r.name()).collect::<Vec<_>>())
            .finish()
    }
}

// ============================================================================
// VALIDATOR-LEVEL RULES
// ============================================================================

/// Uniqueness rule wrapping a caller-supplied async predicate.
struct Unique<F> {
    check: F,
}

#[async_trait]
impl<F, Fut> Rule for Unique<F>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = Result<bool, RuleError>> + Send,
{
    fn name(&self) -> &str {
        "unique"
    }

    async fn apply(
        &self,
        value: &Value,
        _ctx: &ValidationContext,
        _root: &Value,
    ) -> Result<RuleOutcome, RuleError> {
        if is_absent(value) {
            return Ok(RuleOutcome::Pass);
        }
        if (self.check)(value.clone()).await? {
            Ok(RuleOutcome::Pass)
        } else {
            Ok(ValidationError::new(
                ErrorCode::AsyncValidationFailed,
                "Value must be unique",
            )
            .into())
        }
    }
}

/// Context-aware rule wrapping a caller-supplied sync predicate.
struct WithContext<F> {
    check: F,
    message: Cow<'static, str>,
}

#[async_trait]
impl<F> Rule for WithContext<F>
where
    F: Fn(&ValidationContext, &Value) -> bool + Send + Sync,
{
    fn name(&self) -> &str {
        "with_context"
    }

    async fn apply(
        &self,
        value: &Value,
        ctx: &ValidationContext,
        _root: &Value,
    ) -> Result<RuleOutcome, RuleError> {
        if (self.check)(ctx, value) {
            Ok(RuleOutcome::Pass)
        } else {
            Ok(ValidationError::new(ErrorCode::CustomError, self.message.clone()).into())
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_empty_validator_passes_everything() {
        let validator = Validator::new("anything");
        assert!(validator.run(&json!("x")).await.is_valid());
        assert!(validator.run(&Value::Null).await.is_valid());
    }

    #[test]
    fn test_builder_accessors() {
        let validator = Validator::new("username").required().min(3);
        assert_eq!(validator.field_name(), "username");
        assert_eq!(validator.rule_count(), 2);
    }

    #[tokio::test]
    async fn test_default_field_name() {
        let validator = Validator::default().required();
        let result = validator.run(&Value::Null).await;
        assert_eq!(result.errors()[0].field.as_deref(), Some("field"));
    }

    #[tokio::test]
    async fn test_error_order_is_append_order() {
        let validator = Validator::new("age").required().number().min(18);
        let result = validator.run(&Value::Null).await;

        // required fires; number and min both guard against absence.
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].code, ErrorCode::Required);

        let result = validator.run(&json!("not a number")).await;
        let codes: Vec<_> = result.errors().iter().map(|e| e.code.clone()).collect();
        assert_eq!(codes, vec![ErrorCode::InvalidType, ErrorCode::MinLength]);
    }

    #[tokio::test]
    async fn test_failing_rule_does_not_stop_later_rules() {
        let validator = Validator::new("count")
            .try_custom(|_v, _c, _r| Err(RuleError::msg("boom")))
            .min(5);

        let result = validator.run(&json!(2)).await;
        assert_eq!(result.errors().len(), 2);
        assert_eq!(result.errors()[0].code, ErrorCode::CustomError);
        assert_eq!(
            result.errors()[0].message,
            "Validation execution failed: boom"
        );
        assert_eq!(result.errors()[0].field.as_deref(), Some("count"));
        assert_eq!(result.errors()[1].code, ErrorCode::MinValue);
    }

    #[tokio::test]
    async fn test_field_autofill_keeps_preset_field() {
        let validator = Validator::new("outer").custom(|_v, _c, _r| {
            RuleOutcome::FailAll(vec![
                ValidationError::new(ErrorCode::CustomError, "blank"),
                ValidationError::new(ErrorCode::CustomError, "preset").with_field("inner"),
            ])
        });

        let result = validator.run(&json!(1)).await;
        assert_eq!(result.errors()[0].field.as_deref(), Some("outer"));
        assert_eq!(result.errors()[1].field.as_deref(), Some("inner"));
    }

    #[tokio::test]
    async fn test_absence_semantics() {
        // email only fires on non-empty strings.
        let optional = Validator::new("email").email();
        assert!(optional.run(&Value::Null).await.is_valid());

        // required + email on an absent value: exactly one REQUIRED error.
        let mandatory = Validator::new("email").required().email();
        let result = mandatory.run(&Value::Null).await;
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].code, ErrorCode::Required);
    }

    #[tokio::test]
    async fn test_unique_rule() {
        let validator = Validator::new("email").unique(|value| async move {
            Ok(value != json!("taken@example.com"))
        });

        assert!(validator.run(&json!("free@example.com")).await.is_valid());
        assert!(validator.run(&Value::Null).await.is_valid());

        let result = validator.run(&json!("taken@example.com")).await;
        assert_eq!(result.errors()[0].code, ErrorCode::AsyncValidationFailed);
        assert_eq!(result.errors()[0].field.as_deref(), Some("email"));
    }

    #[tokio::test]
    async fn test_unique_predicate_error_becomes_custom_error() {
        let validator = Validator::new("email")
            .unique(|_value| async move { Err(RuleError::msg("store unreachable")) });

        let result = validator.run(&json!("x@y.z")).await;
        assert_eq!(result.errors()[0].code, ErrorCode::CustomError);
        assert!(result.errors()[0].message.contains("store unreachable"));
    }

    #[tokio::test]
    async fn test_with_context() {
        let validator = Validator::new("flag").with_context(
            |ctx, _value| ctx.environment.as_deref() == Some("staging"),
            "Only allowed in staging",
        );

        let staging = ValidationContext::builder().environment("staging").build();
        assert!(
            validator
                .run_with(&json!(true), &staging, &Value::Null)
                .await
                .is_valid()
        );

        let result = validator.run(&json!(true)).await;
        assert_eq!(result.errors()[0].message, "Only allowed in staging");
    }

    #[tokio::test]
    async fn test_idempotent_runs() {
        let validator = Validator::new("username").required().min(3).max(20);
        let first = validator.run(&json!("ab")).await;
        let second = validator.run(&json!("ab")).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_concurrent_runs_share_validator() {
        let validator = std::sync::Arc::new(Validator::new("n").min(10));
        let a = tokio::spawn({
            let v = validator.clone();
            async move { v.run(&json!(5)).await }
        });
        let b = tokio::spawn({
            let v = validator.clone();
            async move { v.run(&json!(15)).await }
        });

        assert!(!a.await.unwrap().is_valid());
        assert!(b.await.unwrap().is_valid());
    }
}
