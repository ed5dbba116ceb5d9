//! # fieldcheck
//!
//! Field-level data validation: attach an ordered pipeline of rules to a
//! named field, run it against a value, and collect structured errors.
//!
//! ## Quick Start
//!
//! ```
//! use fieldcheck::prelude::*;
//! use serde_json::json;
//!
//! # async fn demo() {
//! let username = Validator::new("username").required().min(3).max(20);
//!
//! let result = username.run(&json!("jo")).await;
//! assert!(!result.is_valid());
//! assert_eq!(result.errors()[0].code, ErrorCode::MinLength);
//! # }
//! ```
//!
//! ## Schemas
//!
//! Field validators compose into whole-record schemas; every field sees the
//! full record, so cross-field rules like `match_field` work out of the box:
//!
//! ```
//! use fieldcheck::prelude::*;
//! use serde_json::json;
//!
//! # async fn demo() {
//! let registration = SchemaValidator::builder()
//!     .field("password", Validator::new("password").required().min(8))
//!     .field(
//!         "confirmPassword",
//!         Validator::new("confirmPassword").required().match_field("password"),
//!     )
//!     .build();
//!
//! let result = registration
//!     .run(&json!({"password": "hunter2hunter2", "confirmPassword": "hunter3"}))
//!     .await;
//! assert!(!result.is_valid());
//! # }
//! ```
//!
//! ## Execution model
//!
//! Rules run strictly sequentially in append order and the pipeline never
//! short-circuits: every rule runs regardless of prior failures, so callers
//! see all applicable errors at once. Built-in rules are optional-by-default
//! and pass on absent values; attach [`Validator::required`] to make a field
//! mandatory. A rule that fails to execute is converted into a
//! `CUSTOM_ERROR` finding instead of aborting the run.

pub mod core;
pub mod prelude;
pub mod rules;
