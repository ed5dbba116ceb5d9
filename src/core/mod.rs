//! Core validation types: errors, results, context, the rule contract, and
//! the field and schema validators.
//!
//! # Architecture
//!
//! The core is a small ordered-pipeline evaluator. A [`Validator`] owns a
//! sequence of boxed [`Rule`]s bound to one field name; running it applies
//! every rule to the value, sequentially and without short-circuiting, and
//! aggregates the findings into a [`ValidationResult`]. A
//! [`SchemaValidator`] composes named field validators over a whole record.
//!
//! Errors are data, not control flow: a rule that fails to *run* is caught
//! and reported as a `CUSTOM_ERROR` finding, so one broken check can never
//! abort a run.

pub mod context;
pub mod error;
pub mod result;
pub mod rule;
pub mod schema;
pub mod validator;

pub use context::{ValidationContext, ValidationContextBuilder};
pub use error::{ErrorCode, ErrorParams, Severity, ValidationError};
pub use result::ValidationResult;
pub use rule::{AsyncRule, FallibleRule, Rule, RuleError, RuleOutcome, SimpleRule};
pub use schema::{SchemaValidator, SchemaValidatorBuilder, create_schema};
pub use validator::Validator;
