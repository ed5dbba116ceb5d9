//! Common imports for working with the crate.
//!
//! ```
//! use fieldcheck::prelude::*;
//! ```

pub use crate::core::{
    ErrorCode, Rule, RuleError, RuleOutcome, SchemaValidator, SchemaValidatorBuilder, Severity,
    ValidationContext, ValidationContextBuilder, ValidationError, ValidationResult, Validator,
    create_schema,
};
pub use crate::rules::is_absent;
