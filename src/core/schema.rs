//! Schema validator: fans a whole record out to named field validators.

use std::borrow::Cow;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::trace;

use crate::core::context::ValidationContext;
use crate::core::result::ValidationResult;
use crate::core::validator::Validator;

const NULL: Value = Value::Null;

/// A named collection of field validators applied to a whole record.
///
/// Fields are processed in schema insertion order, which is also the order
/// of the combined error list. The full record is handed to every field
/// validator as the root record, so cross-field rules work unchanged.
/// Fields absent from the schema are never validated.
///
/// # Examples
///
/// ```
/// use fieldcheck::prelude::*;
/// use serde_json::json;
///
/// # async fn demo() {
/// let schema = SchemaValidator::builder()
///     .field("username", Validator::new("username").required().min(3))
///     .field("email", Validator::new("email").required().email())
///     .build();
///
/// let result = schema.run(&json!({"username": "jo", "email": "x"})).await;
/// assert!(!result.is_valid());
/// # }
/// ```
pub struct SchemaValidator {
    fields: IndexMap<String, Validator>,
}

impl SchemaValidator {
    /// Creates a schema validator from an ordered field mapping.
    #[must_use]
    pub fn new(fields: IndexMap<String, Validator>) -> Self {
        Self { fields }
    }

    /// Creates a builder.
    #[must_use]
    pub fn builder() -> SchemaValidatorBuilder {
        SchemaValidatorBuilder::default()
    }

    /// Number of schema fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if the schema has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Schema field names, in processing order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Runs the schema against `data` with an empty context.
    pub async fn run(&self, data: &Value) -> ValidationResult {
        self.run_with(data, &ValidationContext::default()).await
    }

    /// Runs the schema against `data`.
    ///
    /// Each schema field reads the matching property of `data` (missing
    /// properties validate as `null`) and receives `data` itself as the
    /// root record. Errors still lacking a field name after the field
    /// validator ran are attributed to the schema key.
    pub async fn run_with(&self, data: &Value, ctx: &ValidationContext) -> ValidationResult {
        let mut errors = Vec::new();

        for (name, validator) in &self.fields {
            let value = data.get(name).unwrap_or(&NULL);
            let result = validator.run_with(value, ctx, data).await;
            for mut error in result.into_errors() {
                if error.field.is_none() {
                    error.field = Some(Cow::Owned(name.clone()));
                }
                errors.push(error);
            }
        }

        trace!(fields = self.fields.len(), errors = errors.len(), "schema validation finished");
        ValidationResult::from_errors(errors)
    }
}

impl std::fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for [`SchemaValidator`].
#[derive(Debug, Default)]
pub struct SchemaValidatorBuilder {
    fields: IndexMap<String, Validator>,
}

impl SchemaValidatorBuilder {
    /// Adds a field validator under `name`. Re-adding a name replaces the
    /// validator but keeps the original position.
    #[must_use = "builder methods must be chained or built"]
    pub fn field(mut self, name: impl Into<String>, validator: Validator) -> Self {
        self.fields.insert(name.into(), validator);
        self
    }

    /// Finishes the builder.
    #[must_use]
    pub fn build(self) -> SchemaValidator {
        SchemaValidator::new(self.fields)
    }
}

/// Builds a schema validator from `(name, validator)` pairs, preserving
/// their order.
pub fn create_schema(
    fields: impl IntoIterator<Item = (impl Into<String>, Validator)>,
) -> SchemaValidator {
    SchemaValidator::new(
        fields
            .into_iter()
            .map(|(name, validator)| (name.into(), validator))
            .collect(),
    )
}
