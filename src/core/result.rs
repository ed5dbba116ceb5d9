//! Aggregate outcome of one validation run.

use serde::{Deserialize, Serialize};

use crate::core::error::ValidationError;

/// Aggregate result of running a field or schema validator.
///
/// Invariant: `valid == errors.is_empty()`. The constructors maintain it;
/// errors appear in rule execution order (for a schema, in schema key order).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    valid: bool,
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// A successful result with no errors.
    #[must_use]
    pub fn success() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    /// A failed result carrying at least one error.
    ///
    /// # Panics
    ///
    /// Panics if `errors` is empty; use [`ValidationResult::from_errors`]
    /// when the list may be empty.
    #[must_use]
    pub fn failure(errors: Vec<ValidationError>) -> Self {
        assert!(!errors.is_empty(), "failure result requires errors");
        Self {
            valid: false,
            errors,
        }
    }

    /// Builds a result from an accumulated error list, success iff empty.
    #[must_use]
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// True iff no errors were reported.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// The reported errors, in accumulation order.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Consumes the result, returning the error list.
    #[must_use]
    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    /// Appends another result's errors onto this one, in order.
    #[must_use]
    pub fn merge(mut self, other: ValidationResult) -> Self {
        self.errors.extend(other.errors);
        self.valid = self.errors.is_empty();
        self
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::success()
    }
}

impl FromIterator<ValidationError> for ValidationResult {
    fn from_iter<I: IntoIterator<Item = ValidationError>>(iter: I) -> Self {
        Self::from_errors(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorCode;

    #[test]
    fn test_success() {
        let result = ValidationResult::success();
        assert!(result.is_valid());
        assert!(result.errors().is_empty());
    }

    #[test]
    fn test_from_errors_invariant() {
        assert!(ValidationResult::from_errors(Vec::new()).is_valid());

        let failed = ValidationResult::from_errors(vec![ValidationError::new(
            ErrorCode::Required,
            "This field is required",
        )]);
        assert!(!failed.is_valid());
        assert_eq!(failed.errors().len(), 1);
    }

    #[test]
    fn test_failure_requires_errors() {
        let failed =
            ValidationResult::failure(vec![ValidationError::new(ErrorCode::NotNull, "null")]);
        assert!(!failed.is_valid());
    }

    #[test]
    #[should_panic(expected = "failure result requires errors")]
    fn test_failure_rejects_empty_list() {
        let _ = ValidationResult::failure(Vec::new());
    }

    #[test]
    fn test_merge_preserves_order() {
        let a = ValidationResult::from_errors(vec![ValidationError::new(ErrorCode::Required, "a")]);
        let b = ValidationResult::from_errors(vec![ValidationError::new(ErrorCode::MinValue, "b")]);

        let merged = a.merge(b);
        assert!(!merged.is_valid());
        assert_eq!(merged.errors()[0].code, ErrorCode::Required);
        assert_eq!(merged.errors()[1].code, ErrorCode::MinValue);
    }

    #[test]
    fn test_serde_shape() {
        let result = ValidationResult::success();
        let wire = serde_json::to_value(&result).unwrap();
        assert_eq!(wire, serde_json::json!({"valid": true, "errors": []}));
    }
}
