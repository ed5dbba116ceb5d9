//! Cross-field and business rules.
//!
//! Cross-field rules consult the root record supplied to the run; business
//! rules consult the caller's context. A root key that is missing compares
//! as `null`.

use async_trait::async_trait;
use serde_json::Value;

use crate::core::{ErrorCode, Rule, RuleError, RuleOutcome, ValidationContext, ValidationError};
use crate::rules::is_absent;

// ============================================================================
// CROSS-FIELD RULES
// ============================================================================

/// Requires the value to equal another field of the root record, e.g. a
/// password confirmation.
#[derive(Debug, Clone)]
pub struct MatchesField {
    other: String,
    label: Option<String>,
}

/// Creates a [`MatchesField`] rule against `other`.
#[must_use]
pub fn matches_field(other: impl Into<String>) -> MatchesField {
    MatchesField {
        other: other.into(),
        label: None,
    }
}

impl MatchesField {
    /// Sets a display label for the other field, used in the message.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

#[async_trait]
impl Rule for MatchesField {
    fn name(&self) -> &str {
        "matches_field"
    }

    async fn apply(
        &self,
        value: &Value,
        _ctx: &ValidationContext,
        root: &Value,
    ) -> Result<RuleOutcome, RuleError> {
        let expected = root.get(&self.other).unwrap_or(&Value::Null);
        if expected != value {
            let label = self.label.as_deref().unwrap_or(&self.other);
            return Ok(ValidationError::new(
                ErrorCode::CrossFieldInvalid,
                format!("Value must match {label}"),
            )
            .with_param("otherField", self.other.as_str())
            .into());
        }
        Ok(RuleOutcome::Pass)
    }
}

/// Makes the field mandatory when another field of the root record holds an
/// expected value.
#[derive(Debug, Clone)]
pub struct RequiredIf {
    other: String,
    expected: Value,
}

/// Creates a [`RequiredIf`] rule.
#[must_use]
pub fn required_if(other: impl Into<String>, expected: impl Into<Value>) -> RequiredIf {
    RequiredIf {
        other: other.into(),
        expected: expected.into(),
    }
}

#[async_trait]
impl Rule for RequiredIf {
    fn name(&self) -> &str {
        "required_if"
    }

    async fn apply(
        &self,
        value: &Value,
        _ctx: &ValidationContext,
        root: &Value,
    ) -> Result<RuleOutcome, RuleError> {
        let other = root.get(&self.other).unwrap_or(&Value::Null);
        if *other == self.expected && is_absent(value) {
            return Ok(ValidationError::new(
                ErrorCode::MissingRequired,
                format!("Field is required when {} is {}", self.other, self.expected),
            )
            .into());
        }
        Ok(RuleOutcome::Pass)
    }
}

// ============================================================================
// BUSINESS RULES
// ============================================================================

/// Restricts email values to an allow-list of domains.
#[derive(Debug, Clone)]
pub struct AllowedDomains {
    domains: Vec<String>,
}

/// Creates an [`AllowedDomains`] rule.
#[must_use]
pub fn allowed_domains(domains: impl IntoIterator<Item = impl Into<String>>) -> AllowedDomains {
    AllowedDomains {
        domains: domains.into_iter().map(Into::into).collect(),
    }
}

#[async_trait]
impl Rule for AllowedDomains {
    fn name(&self) -> &str {
        "allowed_domains"
    }

    async fn apply(
        &self,
        value: &Value,
        _ctx: &ValidationContext,
        _root: &Value,
    ) -> Result<RuleOutcome, RuleError> {
        if let Value::String(s) = value
            && let Some(domain) = s.split('@').nth(1)
            && !domain.is_empty()
            && !self.domains.iter().any(|d| d == domain)
        {
            return Ok(ValidationError::new(
                ErrorCode::CustomError,
                format!("Email domain must be one of: {}", self.domains.join(", ")),
            )
            .into());
        }
        Ok(RuleOutcome::Pass)
    }
}

/// Restricts the field to callers whose context carries the `admin` role.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminOnly;

/// Creates an [`AdminOnly`] rule.
#[must_use]
pub fn admin_only() -> AdminOnly {
    AdminOnly
}

#[async_trait]
impl Rule for AdminOnly {
    fn name(&self) -> &str {
        "admin_only"
    }

    async fn apply(
        &self,
        _value: &Value,
        ctx: &ValidationContext,
        _root: &Value,
    ) -> Result<RuleOutcome, RuleError> {
        if ctx.user_role.as_deref() != Some("admin") {
            return Ok(ValidationError::new(
                ErrorCode::SecurityRisk,
                "This field is restricted to admins",
            )
            .into());
        }
        Ok(RuleOutcome::Pass)
    }
}

// ============================================================================
// TESTS
// ============================================================================
