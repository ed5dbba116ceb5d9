//! Basic usage: field validation, async uniqueness, cross-field checks,
//! and context-aware rules.

use fieldcheck::prelude::*;
use serde_json::{Value, json};

fn print_result(label: &str, result: &ValidationResult) {
    if result.is_valid() {
        println!("✓ {label}: valid");
    } else {
        println!("✗ {label}:");
        for error in result.errors() {
            println!("    {error}");
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // 1. Basic email validation with a business rule.
    let email = Validator::new("email")
        .required()
        .email()
        .allowed_domains(["company.com"]);

    print_result("invalid email", &email.run(&json!("invalid-email")).await);
    print_result("wrong domain", &email.run(&json!("user@gmail.com")).await);
    print_result("valid email", &email.run(&json!("jeel@company.com")).await);

    // 2. Async uniqueness check against a mock store.
    let existing = ["test@company.com"];
    let unique_email = Validator::new("email").email().unique(move |value| async move {
        Ok(!existing.iter().any(|known| Some(*known) == value.as_str()))
    });

    print_result(
        "duplicate email",
        &unique_email.run(&json!("test@company.com")).await,
    );

    // 3. Cross-field validation on a registration form.
    let registration = json!({
        "password": "securePassword123!",
        "confirmPassword": "wrongPassword",
    });

    let confirm = Validator::new("confirmPassword")
        .required()
        .match_field("password");

    print_result(
        "password mismatch",
        &confirm
            .run_with(
                &registration["confirmPassword"],
                &ValidationContext::new(),
                &registration,
            )
            .await,
    );

    // 4. Context-aware validation.
    let delete_action = Validator::new("deleteAction").admin_only();

    let user_ctx = ValidationContext::builder().user_role("user").build();
    let admin_ctx = ValidationContext::builder().user_role("admin").build();

    print_result(
        "delete as user",
        &delete_action
            .run_with(&json!("delete"), &user_ctx, &Value::Null)
            .await,
    );
    print_result(
        "delete as admin",
        &delete_action
            .run_with(&json!("delete"), &admin_ctx, &Value::Null)
            .await,
    );
}
