//! The rule contract: one reusable check applied to one value.
//!
//! A rule sees the value under validation, the caller's context, and the
//! enclosing record (for cross-field checks), and reports zero, one, or many
//! errors. Rules are stateless after construction; factories capture their
//! configuration by value.

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;

use async_trait::async_trait;
use serde_json::Value;

use crate::core::context::ValidationContext;
use crate::core::error::ValidationError;

// ============================================================================
// RULE ERROR
// ============================================================================

/// Failure of rule *execution* itself, as opposed to a validation finding.
///
/// This is the "rule threw" channel: the owning validator catches it and
/// converts it into a single `CUSTOM_ERROR` finding instead of aborting the
/// run.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// Free-form failure message.
    #[error("{0}")]
    Message(String),

    /// Underlying error from an external collaborator (store, service).
    #[error(transparent)]
    Source(#[from] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl RuleError {
    /// Creates a message-only rule error.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

// ============================================================================
// RULE OUTCOME
// ============================================================================

/// Outcome of applying one rule to one value.
#[derive(Debug, Clone, Default)]
pub enum RuleOutcome {
    /// The value passed the check.
    #[default]
    Pass,
    /// One error.
    Fail(ValidationError),
    /// Several errors reported by a single rule.
    FailAll(Vec<ValidationError>),
}

impl RuleOutcome {
    /// True iff the rule reported no errors.
    #[must_use]
    pub fn is_pass(&self) -> bool {
        match self {
            Self::Pass => true,
            Self::Fail(_) => false,
            Self::FailAll(errors) => errors.is_empty(),
        }
    }

    /// Consumes the outcome, returning its errors (empty on pass).
    #[must_use]
    pub fn into_errors(self) -> Vec<ValidationError> {
        match self {
            Self::Pass => Vec::new(),
            Self::Fail(error) => vec![error],
            Self::FailAll(errors) => errors,
        }
    }
}

impl From<ValidationError> for RuleOutcome {
    fn from(error: ValidationError) -> Self {
        Self::Fail(error)
    }
}

impl From<Option<ValidationError>> for RuleOutcome {
    fn from(error: Option<ValidationError>) -> Self {
        error.map_or(Self::Pass, Self::Fail)
    }
}

impl From<Vec<ValidationError>> for RuleOutcome {
    fn from(errors: Vec<ValidationError>) -> Self {
        if errors.is_empty() {
            Self::Pass
        } else {
            Self::FailAll(errors)
        }
    }
}

// ============================================================================
// RULE TRAIT
// ============================================================================

/// A single reusable check, parameterized at construction.
///
/// `value` is the value under validation, `ctx` the caller-supplied context,
/// and `root` the enclosing record (`Value::Null` when validating a lone
/// field). Implementations must not mutate shared state; the same rule may
/// be applied any number of times.
#[async_trait]
pub trait Rule: Send + Sync {
    /// Short name for diagnostics and tracing.
    fn name(&self) -> &str;

    /// Applies the rule.
    ///
    /// `Err` means the check itself could not run; the owning validator
    /// converts it into a `CUSTOM_ERROR` finding.
    async fn apply(
        &self,
        value: &Value,
        ctx: &ValidationContext,
        root: &Value,
    ) -> Result<RuleOutcome, RuleError>;
}

// ============================================================================
// CLOSURE ADAPTERS
// ============================================================================

/// Adapts an infallible sync closure to the [`Rule`] contract.
pub struct SimpleRule<F> {
    name: &'static str,
    check: F,
}

impl<F> SimpleRule<F>
where
    F: Fn(&Value, &ValidationContext, &Value) -> RuleOutcome + Send + Sync,
{
    /// Wraps a sync closure as a rule.
    pub fn new(name: &'static str, check: F) -> Self {
        Self { name, check }
    }
}

#[async_trait]
impl<F> Rule for SimpleRule<F>
where
    F: Fn(&Value, &ValidationContext, &Value) -> RuleOutcome + Send + Sync,
{
    fn name(&self) -> &str {
        self.name
    }

    async fn apply(
        &self,
        value: &Value,
        ctx: &ValidationContext,
        root: &Value,
    ) -> Result<RuleOutcome, RuleError> {
        Ok((self.check)(value, ctx, root))
    }
}

impl<F> fmt::Debug for SimpleRule<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleRule")
            .field("name", &self.name)
            .field("check", &"<function>")
            .finish()
    }
}

/// Adapts a fallible sync closure to the [`Rule`] contract.
pub struct FallibleRule<F> {
    name: &'static str,
    check: F,
}

impl<F> FallibleRule<F>
where
    F: Fn(&Value, &ValidationContext, &Value) -> Result<RuleOutcome, RuleError> + Send + Sync,
{
    /// Wraps a fallible sync closure as a rule.
    pub fn new(name: &'static str, check: F) -> Self {
        Self { name, check }
    }
}

#[async_trait]
impl<F> Rule for FallibleRule<F>
where
    F: Fn(&Value, &ValidationContext, &Value) -> Result<RuleOutcome, RuleError> + Send + Sync,
{
    fn name(&self) -> &str {
        self.name
    }

    async fn apply(
        &self,
        value: &Value,
        ctx: &ValidationContext,
        root: &Value,
    ) -> Result<RuleOutcome, RuleError> {
        (self.check)(value, ctx, root)
    }
}

impl<F> fmt::Debug for FallibleRule<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FallibleRule")
            .field("name", &self.name)
            .field("check", &"<function>")
            .finish()
    }
}

/// Adapts an async closure to the [`Rule`] contract.
///
/// The closure receives owned clones of the value, context, and root so the
/// returned future is self-contained.
pub struct AsyncRule<F, Fut> {
    name: &'static str,
    check: F,
    _phantom: PhantomData<fn() -> Fut>,
}

impl<F, Fut> AsyncRule<F, Fut>
where
    F: Fn(Value, ValidationContext, Value) -> Fut + Send + Sync,
    Fut: Future<Output = Result<RuleOutcome, RuleError>> + Send,
{
    /// Wraps an async closure as a rule.
    pub fn new(name: &'static str, check: F) -> Self {
        Self {
            name,
            check,
            _phantom: PhantomData,
        }
    }
}

#[async_trait]
impl<F, Fut> Rule for AsyncRule<F, Fut>
where
    F: Fn(Value, ValidationContext, Value) -> Fut + Send + Sync,
    Fut: Future<Output = Result<RuleOutcome, RuleError>> + Send,
{
    fn name(&self) -> &str {
        self.name
    }

    async fn apply(
        &self,
        value: &Value,
        ctx: &ValidationContext,
        root: &Value,
    ) -> Result<RuleOutcome, RuleError> {
        (self.check)(value.clone(), ctx.clone(), root.clone()).await
    }
}

impl<F, Fut> fmt::Debug for AsyncRule<F, Fut> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncRule")
            .field("name", &self.name)
            .field("check", &"<function>")
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_simple_rule() {
        let rule = SimpleRule::new("non_negative", |value, _ctx, _root| {
            match value.as_f64() {
                Some(n) if n < 0.0 => {
                    ValidationError::new(ErrorCode::MinValue, "Value must not be negative").into()
                }
                _ => RuleOutcome::Pass,
            }
        });

        let ctx = ValidationContext::new();
        let outcome = rule.apply(&json!(1), &ctx, &Value::Null).await.unwrap();
        assert!(outcome.is_pass());

        let outcome = rule.apply(&json!(-1), &ctx, &Value::Null).await.unwrap();
        assert_eq!(outcome.into_errors().len(), 1);
    }

    #[tokio::test]
    async fn test_fallible_rule_error() {
        let rule = FallibleRule::new("broken", |_value, _ctx, _root| {
            Err(RuleError::msg("store unreachable"))
        });

        let ctx = ValidationContext::new();
        let err = rule
            .apply(&Value::Null, &ctx, &Value::Null)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "store unreachable");
    }

    #[tokio::test]
    async fn test_async_rule() {
        let rule = AsyncRule::new("lookup", |value, _ctx, _root| async move {
            if value == json!("taken") {
                Ok(RuleOutcome::Fail(ValidationError::new(
                    ErrorCode::AsyncValidationFailed,
                    "Value must be unique",
                )))
            } else {
                Ok(RuleOutcome::Pass)
            }
        });

        let ctx = ValidationContext::new();
        assert!(
            rule.apply(&json!("free"), &ctx, &Value::Null)
                .await
                .unwrap()
                .is_pass()
        );
        assert!(
            !rule
                .apply(&json!("taken"), &ctx, &Value::Null)
                .await
                .unwrap()
                .is_pass()
        );
    }

    #[test]
    fn test_outcome_conversions() {
        assert!(RuleOutcome::from(Vec::<ValidationError>::new()).is_pass());
        assert!(RuleOutcome::from(Option::<ValidationError>::None).is_pass());

        let outcome = RuleOutcome::from(vec![
            ValidationError::new(ErrorCode::Required, "a"),
            ValidationError::new(ErrorCode::MinValue, "b"),
        ]);
        assert_eq!(outcome.into_errors().len(), 2);
    }
}
