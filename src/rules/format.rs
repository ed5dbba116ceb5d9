//! Format rules: email, url, uuid, phone, ip, and date checks.
//!
//! Format rules only fire on non-empty strings; every other value passes.
//! Pair them with `required()` when the field is mandatory.

use std::net::IpAddr;
use std::sync::LazyLock;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde_json::Value;

use crate::core::{ErrorCode, Rule, RuleError, RuleOutcome, ValidationContext, ValidationError};

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?([\da-z.-]+)\.([a-z.]{2,6})([/\w .-]*)*/?$").unwrap()
});

static UUID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$").unwrap()
});

/// Returns the value as a non-empty string, the only shape format rules see.
fn present_str(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    }
}

/// Parses the date shapes accepted by the date rules: RFC 3339 or
/// `YYYY-MM-DD` (read as midnight UTC).
fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

// ============================================================================
// EMAIL / URL / UUID
// ============================================================================

/// Email address format check.
#[derive(Debug, Clone, Copy, Default)]
pub struct Email;

/// Creates an [`Email`] rule.
#[must_use]
pub fn email() -> Email {
    Email
}

#[async_trait]
impl Rule for Email {
    fn name(&self) -> &str {
        "email"
    }

    async fn apply(
        &self,
        value: &Value,
        _ctx: &ValidationContext,
        _root: &Value,
    ) -> Result<RuleOutcome, RuleError> {
        if let Some(s) = present_str(value)
            && !EMAIL_REGEX.is_match(s)
        {
            return Ok(
                ValidationError::new(ErrorCode::InvalidEmail, "Invalid email address").into(),
            );
        }
        Ok(RuleOutcome::Pass)
    }
}

/// URL format check.
#[derive(Debug, Clone, Copy, Default)]
pub struct Url;

/// Creates a [`Url`] rule.
#[must_use]
pub fn url() -> Url {
    Url
}

#[async_trait]
impl Rule for Url {
    fn name(&self) -> &str {
        "url"
    }

    async fn apply(
        &self,
        value: &Value,
        _ctx: &ValidationContext,
        _root: &Value,
    ) -> Result<RuleOutcome, RuleError> {
        if let Some(s) = present_str(value)
            && !URL_REGEX.is_match(s)
        {
            return Ok(ValidationError::new(ErrorCode::InvalidUrl, "Invalid URL").into());
        }
        Ok(RuleOutcome::Pass)
    }
}

/// UUID format check. Accepts the hyphenated form only.
#[derive(Debug, Clone, Copy, Default)]
pub struct Uuid;

/// Creates a [`Uuid`] rule.
#[must_use]
pub fn uuid() -> Uuid {
    Uuid
}

#[async_trait]
impl Rule for Uuid {
    fn name(&self) -> &str {
        "uuid"
    }

    async fn apply(
        &self,
        value: &Value,
        _ctx: &ValidationContext,
        _root: &Value,
    ) -> Result<RuleOutcome, RuleError> {
        if let Some(s) = present_str(value)
            && !UUID_REGEX.is_match(s)
        {
            return Ok(ValidationError::new(ErrorCode::InvalidUuid, "Invalid UUID").into());
        }
        Ok(RuleOutcome::Pass)
    }
}

// ============================================================================
// PHONE / IP
// ============================================================================

/// Phone number check: optional leading `+`, common separators, 7-15 digits.
#[derive(Debug, Clone, Copy, Default)]
pub struct Phone;

/// Creates a [`Phone`] rule.
#[must_use]
pub fn phone() -> Phone {
    Phone
}

impl Phone {
    fn is_valid(input: &str) -> bool {
        let mut digits = 0usize;
        for (i, c) in input.chars().enumerate() {
            match c {
                '0'..='9' => digits += 1,
                '+' if i == 0 => {}
                ' ' | '(' | ')' | '-' | '.' => {}
                _ => return false,
            }
        }
        (7..=15).contains(&digits)
    }
}

#[async_trait]
impl Rule for Phone {
    fn name(&self) -> &str {
        "phone"
    }

    async fn apply(
        &self,
        value: &Value,
        _ctx: &ValidationContext,
        _root: &Value,
    ) -> Result<RuleOutcome, RuleError> {
        if let Some(s) = present_str(value)
            && !Self::is_valid(s)
        {
            return Ok(
                ValidationError::new(ErrorCode::InvalidPhone, "Invalid phone number").into(),
            );
        }
        Ok(RuleOutcome::Pass)
    }
}

/// IP address check, v4 or v6.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ip;

/// Creates an [`Ip`] rule.
#[must_use]
pub fn ip() -> Ip {
    Ip
}

#[async_trait]
impl Rule for Ip {
    fn name(&self) -> &str {
        "ip"
    }

    async fn apply(
        &self,
        value: &Value,
        _ctx: &ValidationContext,
        _root: &Value,
    ) -> Result<RuleOutcome, RuleError> {
        if let Some(s) = present_str(value)
            && s.parse::<IpAddr>().is_err()
        {
            return Ok(ValidationError::new(ErrorCode::InvalidIp, "Invalid IP address").into());
        }
        Ok(RuleOutcome::Pass)
    }
}

// ============================================================================
// DATES
// ============================================================================

/// Date parse check.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsDate;

/// Creates an [`IsDate`] rule.
#[must_use]
pub fn date() -> IsDate {
    IsDate
}

#[async_trait]
impl Rule for IsDate {
    fn name(&self) -> &str {
        "date"
    }

    async fn apply(
        &self,
        value: &Value,
        _ctx: &ValidationContext,
        _root: &Value,
    ) -> Result<RuleOutcome, RuleError> {
        if let Some(s) = present_str(value)
            && parse_date(s).is_none()
        {
            return Ok(ValidationError::new(ErrorCode::InvalidDate, "Invalid date").into());
        }
        Ok(RuleOutcome::Pass)
    }
}

/// Requires a date strictly in the future. Unparseable input also fails,
/// under the same code.
#[derive(Debug, Clone, Copy, Default)]
pub struct FutureDate;

/// Creates a [`FutureDate`] rule.
#[must_use]
pub fn future() -> FutureDate {
    FutureDate
}

#[async_trait]
impl Rule for FutureDate {
    fn name(&self) -> &str {
        "future"
    }

    async fn apply(
        &self,
        value: &Value,
        _ctx: &ValidationContext,
        _root: &Value,
    ) -> Result<RuleOutcome, RuleError> {
        if let Some(s) = present_str(value)
            && parse_date(s).is_none_or(|date| date <= Utc::now())
        {
            return Ok(
                ValidationError::new(ErrorCode::FutureDate, "Date must be in the future").into(),
            );
        }
        Ok(RuleOutcome::Pass)
    }
}

/// Requires a date strictly in the past. Unparseable input also fails,
/// under the same code.
#[derive(Debug, Clone, Copy, Default)]
pub struct PastDate;

/// Creates a [`PastDate`] rule.
#[must_use]
pub fn past() -> PastDate {
    PastDate
}

#[async_trait]
impl Rule for PastDate {
    fn name(&self) -> &str {
        "past"
    }

    async fn apply(
        &self,
        value: &Value,
        _ctx: &ValidationContext,
        _root: &Value,
    ) -> Result<RuleOutcome, RuleError> {
        if let Some(s) = present_str(value)
            && parse_date(s).is_none_or(|date| date >= Utc::now())
        {
            return Ok(
                ValidationError::new(ErrorCode::PastDate, "Date must be in the past").into(),
            );
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
    async fn test_email() {
        let rule = email();
        assert!(run(&rule, json!("user@example.com")).await.is_pass());
        assert!(!run(&rule, json!("not-an-email")).await.is_pass());
        assert!(!run(&rule, json!("a b@example.com")).await.is_pass());
    }

    #[tokio::test]
    async fn test_format_rules_skip_absent_and_non_strings() {
        assert!(run(&email(), Value::Null).await.is_pass());
        assert!(run(&email(), json!("")).await.is_pass());
        assert!(run(&email(), json!(42)).await.is_pass());
        assert!(run(&url(), json!("")).await.is_pass());
        assert!(run(&uuid(), Value::Null).await.is_pass());
        assert!(run(&date(), json!(true)).await.is_pass());
    }

    #[tokio::test]
    async fn test_url() {
        let rule = url();
        assert!(run(&rule, json!("https://example.com/path")).await.is_pass());
        assert!(run(&rule, json!("example.com")).await.is_pass());
        assert!(!run(&rule, json!("not a url")).await.is_pass());
    }

    #[tokio::test]
    async fn test_uuid_hyphenated_only() {
        let rule = uuid();
        assert!(
            run(&rule, json!("550e8400-e29b-41d4-a716-446655440000"))
                .await
                .is_pass()
        );
        assert!(
            run(&rule, json!("550E8400-E29B-41D4-A716-446655440000"))
                .await
                .is_pass()
        );
        assert!(
            !run(&rule, json!("550e8400e29b41d4a716446655440000"))
                .await
                .is_pass()
        );
    }

    #[tokio::test]
    async fn test_phone() {
        let rule = phone();
        assert!(run(&rule, json!("+14155551234")).await.is_pass());
        assert!(run(&rule, json!("+1 (415) 555-1234")).await.is_pass());
        assert!(!run(&rule, json!("555-12")).await.is_pass()); // too few digits
        assert!(!run(&rule, json!("call me")).await.is_pass());
    }

    #[tokio::test]
    async fn test_ip() {
        let rule = ip();
        assert!(run(&rule, json!("192.168.0.1")).await.is_pass());
        assert!(run(&rule, json!("::1")).await.is_pass());
        assert!(!run(&rule, json!("999.0.0.1")).await.is_pass());
    }

    #[tokio::test]
    async fn test_date() {
        let rule = date();
        assert!(run(&rule, json!("2024-06-01")).await.is_pass());
        assert!(run(&rule, json!("2024-06-01T10:30:00Z")).await.is_pass());
        assert!(!run(&rule, json!("not a date")).await.is_pass());
    }

    #[tokio::test]
    async fn test_future() {
        let rule = future();
        assert!(run(&rule, json!("2099-01-01")).await.is_pass());
        let errors = run(&rule, json!("2000-01-01")).await.into_errors();
        assert_eq!(errors[0].code, ErrorCode::FutureDate);
        // Unparseable input fails under the same code.
        let errors = run(&rule, json!("soon")).await.into_errors();
        assert_eq!(errors[0].code, ErrorCode::FutureDate);
    }

    #[tokio::test]
    async fn test_past() {
        let rule = past();
        assert!(run(&rule, json!("2000-01-01")).await.is_pass());
        assert!(!run(&rule, json!("2099-01-01")).await.is_pass());
    }
}
