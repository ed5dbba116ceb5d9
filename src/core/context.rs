//! Per-run validation context.
//!
//! The context carries caller-supplied environment data into rules: the
//! recognized keys are named fields, everything else goes through the open
//! extension map. Rules receive `&ValidationContext` and never mutate it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Contextual data supplied by the caller for one validation run.
///
/// # Examples
///
/// ```
/// use fieldcheck::core::ValidationContext;
///
/// let ctx = ValidationContext::builder()
///     .user_role("admin")
///     .endpoint("/users")
///     .with("tenant", "acme")
///     .build();
///
/// assert_eq!(ctx.user_role.as_deref(), Some("admin"));
/// assert_eq!(ctx.get("tenant"), Some(&serde_json::json!("acme")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationContext {
    /// Role of the acting user, consulted by access-sensitive rules.
    #[serde(rename = "userRole", default, skip_serializing_if = "Option::is_none")]
    pub user_role: Option<String>,

    /// Endpoint the validated payload arrived on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Deployment environment, e.g. `production`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,

    /// Open extension map for arbitrary caller keys.
    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

impl ValidationContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder.
    #[must_use]
    pub fn builder() -> ValidationContextBuilder {
        ValidationContextBuilder::default()
    }

    /// Inserts an extension value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.extra.insert(key.into(), value.into());
    }

    /// Looks up an extension value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// True if the extension map contains `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.extra.contains_key(key)
    }
}

/// Builder for [`ValidationContext`].
#[derive(Debug, Default)]
pub struct ValidationContextBuilder {
    ctx: ValidationContext,
}

impl ValidationContextBuilder {
    /// Sets the user role.
    #[must_use = "builder methods must be chained or built"]
    pub fn user_role(mut self, role: impl Into<String>) -> Self {
        self.ctx.user_role = Some(role.into());
        self
    }

    /// Sets the endpoint.
    #[must_use = "builder methods must be chained or built"]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.ctx.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the environment.
    #[must_use = "builder methods must be chained or built"]
    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.ctx.environment = Some(environment.into());
        self
    }

    /// Adds an extension value.
    #[must_use = "builder methods must be chained or built"]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.ctx.insert(key, value);
        self
    }

    /// Finishes the builder.
    #[must_use]
    pub fn build(self) -> ValidationContext {
        self.ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_get() {
        let mut ctx = ValidationContext::new();
        ctx.insert("attempts", 3);

        assert_eq!(ctx.get("attempts"), Some(&json!(3)));
        assert_eq!(ctx.get("missing"), None);
        assert!(ctx.contains("attempts"));
    }

    #[test]
    fn test_builder() {
        let ctx = ValidationContext::builder()
            .user_role("admin")
            .environment("staging")
            .with("tenant", "acme")
            .build();

        assert_eq!(ctx.user_role.as_deref(), Some("admin"));
        assert_eq!(ctx.environment.as_deref(), Some("staging"));
        assert_eq!(ctx.get("tenant"), Some(&json!("acme")));
    }

    #[test]
    fn test_serde_wire_names() {
        let ctx = ValidationContext::builder()
            .user_role("user")
            .with("requestId", "r-1")
            .build();

        let wire = serde_json::to_value(&ctx).unwrap();
        assert_eq!(wire, json!({"userRole": "user", "requestId": "r-1"}));

        let back: ValidationContext = serde_json::from_value(wire).unwrap();
        assert_eq!(back, ctx);
    }
}
