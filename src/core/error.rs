//! Validation error model: codes, severities, structured errors.
//!
//! String fields use `Cow<'static, str>` for zero-allocation in the common
//! case of static error messages.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use smallvec::SmallVec;

// ============================================================================
// ERROR CODE
// ============================================================================

/// Symbolic identifier for a validation failure.
///
/// The named variants form a closed, stable enumeration that downstream
/// consumers (UI layers, API clients) switch on. Custom rules may report
/// arbitrary codes through [`ErrorCode::Other`].
///
/// Codes serialize as their `SCREAMING_SNAKE_CASE` string; the string set is
/// a wire contract and must not change between releases.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ErrorCode {
    Required,
    NotNull,
    NotEmpty,
    InvalidType,
    MinValue,
    MaxValue,
    Range,
    MinLength,
    MaxLength,
    LengthRange,
    InvalidFormat,
    PatternMismatch,
    ContainsForbidden,
    MissingRequired,
    CrossFieldInvalid,
    CustomError,
    AsyncValidationFailed,
    SecurityRisk,
    ContentPolicy,
    InvalidEmail,
    InvalidPhone,
    InvalidUrl,
    InvalidUuid,
    InvalidIp,
    InvalidDate,
    PastDate,
    FutureDate,
    /// Escape hatch for codes reported by user-supplied rules.
    Other(String),
}

impl ErrorCode {
    /// Returns the stable string identifier for this code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Required => "REQUIRED",
            Self::NotNull => "NOT_NULL",
            Self::NotEmpty => "NOT_EMPTY",
            Self::InvalidType => "INVALID_TYPE",
            Self::MinValue => "MIN_VALUE",
            Self::MaxValue => "MAX_VALUE",
            Self::Range => "RANGE",
            Self::MinLength => "MIN_LENGTH",
            Self::MaxLength => "MAX_LENGTH",
            Self::LengthRange => "LENGTH_RANGE",
            Self::InvalidFormat => "INVALID_FORMAT",
            Self::PatternMismatch => "PATTERN_MISMATCH",
            Self::ContainsForbidden => "CONTAINS_FORBIDDEN",
            Self::MissingRequired => "MISSING_REQUIRED",
            Self::CrossFieldInvalid => "CROSS_FIELD_INVALID",
            Self::CustomError => "CUSTOM_ERROR",
            Self::AsyncValidationFailed => "ASYNC_VALIDATION_FAILED",
            Self::SecurityRisk => "SECURITY_RISK",
            Self::ContentPolicy => "CONTENT_POLICY",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidPhone => "INVALID_PHONE",
            Self::InvalidUrl => "INVALID_URL",
            Self::InvalidUuid => "INVALID_UUID",
            Self::InvalidIp => "INVALID_IP",
            Self::InvalidDate => "INVALID_DATE",
            Self::PastDate => "PAST_DATE",
            Self::FutureDate => "FUTURE_DATE",
            Self::Other(code) => code,
        }
    }
}

impl From<String> for ErrorCode {
    fn from(s: String) -> Self {
        match s.as_str() {
            "REQUIRED" => Self::Required,
            "NOT_NULL" => Self::NotNull,
            "NOT_EMPTY" => Self::NotEmpty,
            "INVALID_TYPE" => Self::InvalidType,
            "MIN_VALUE" => Self::MinValue,
            "MAX_VALUE" => Self::MaxValue,
            "RANGE" => Self::Range,
            "MIN_LENGTH" => Self::MinLength,
            "MAX_LENGTH" => Self::MaxLength,
            "LENGTH_RANGE" => Self::LengthRange,
            "INVALID_FORMAT" => Self::InvalidFormat,
            "PATTERN_MISMATCH" => Self::PatternMismatch,
            "CONTAINS_FORBIDDEN" => Self::ContainsForbidden,
            "MISSING_REQUIRED" => Self::MissingRequired,
            "CROSS_FIELD_INVALID" => Self::CrossFieldInvalid,
            "CUSTOM_ERROR" => Self::CustomError,
            "ASYNC_VALIDATION_FAILED" => Self::AsyncValidationFailed,
            "SECURITY_RISK" => Self::SecurityRisk,
            "CONTENT_POLICY" => Self::ContentPolicy,
            "INVALID_EMAIL" => Self::InvalidEmail,
            "INVALID_PHONE" => Self::InvalidPhone,
            "INVALID_URL" => Self::InvalidUrl,
            "INVALID_UUID" => Self::InvalidUuid,
            "INVALID_IP" => Self::InvalidIp,
            "INVALID_DATE" => Self::InvalidDate,
            "PAST_DATE" => Self::PastDate,
            "FUTURE_DATE" => Self::FutureDate,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for ErrorCode {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<ErrorCode> for String {
    fn from(code: ErrorCode) -> Self {
        match code {
            ErrorCode::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SEVERITY
// ============================================================================

/// Severity of a validation error.
///
/// Lets callers decide whether a reported condition should block an
/// operation; the validators themselves treat all severities alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Must be fixed (default).
    #[default]
    Error,
    /// Should be addressed but does not have to block.
    Warning,
    /// Informational.
    Info,
}

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// Auxiliary data attached to an error, e.g. `min: 3`.
///
/// Stored as ordered key-value pairs (typically 0-2 params), serialized as a
/// JSON object.
pub type ErrorParams = SmallVec<[(Cow<'static, str>, Value); 2]>;

/// One reported validation problem.
///
/// Errors are produced unattributed (`field: None`) by rules; the owning
/// field validator fills in `field` before handing the error to the caller.
/// A field set by the rule itself is never overwritten.
///
/// # Examples
///
/// ```
/// use fieldcheck::core::{ErrorCode, ValidationError};
///
/// let error = ValidationError::new(ErrorCode::MinLength, "Length must be at least 3")
///     .with_param("min", 3);
/// assert_eq!(error.code.as_str(), "MIN_LENGTH");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Name of the offending field; filled by the owning validator if blank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<Cow<'static, str>>,

    /// Symbolic failure code.
    #[serde(rename = "errorCode")]
    pub code: ErrorCode,

    /// Human-readable message in English.
    pub message: Cow<'static, str>,

    /// Severity of the problem.
    #[serde(default)]
    pub severity: Severity,

    /// Auxiliary data for message templating.
    #[serde(default, with = "param_map", skip_serializing_if = "SmallVec::is_empty")]
    pub params: ErrorParams,
}

impl ValidationError {
    /// Creates a new unattributed error with the default `Error` severity.
    pub fn new(code: impl Into<ErrorCode>, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            field: None,
            code: code.into(),
            message: message.into(),
            severity: Severity::Error,
            params: SmallVec::new(),
        }
    }

    /// Sets the field name.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_field(mut self, field: impl Into<Cow<'static, str>>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Adds an auxiliary parameter.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_param(mut self, key: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Sets the severity.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Looks up a parameter value by key.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params
            .iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(field) = &self.field {
            write!(f, "[{}] {}: {}", field, self.code, self.message)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

/// Serializes the ordered param pairs as a JSON object.
mod param_map {
    use super::{Cow, ErrorParams, Value};
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(params: &ErrorParams, ser: S) -> Result<S::Ok, S::Error> {
        let mut map = ser.serialize_map(Some(params.len()))?;
        for (key, value) in params {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<ErrorParams, D::Error> {
        let map = serde_json::Map::deserialize(de)?;
        Ok(map
            .into_iter()
            .map(|(k, v)| (Cow::Owned(k), v))
            .collect())
    }
}

// ============================================================================
// TESTS
// ============================================================================
