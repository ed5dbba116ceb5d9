//! Schema usage: validating a whole record with per-field validators.

use fieldcheck::prelude::*;
use serde_json::json;

fn user_profile_schema() -> SchemaValidator {
    SchemaValidator::builder()
        .field("username", Validator::new("username").required().min(3).max(20))
        .field("email", Validator::new("email").required().email())
        .field("age", Validator::new("age").number().min(18))
        // Optional by default: only checked when present.
        .field("website", Validator::new("website").url())
        .build()
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let schema = user_profile_schema();

    let valid_user = json!({
        "username": "jeel_dev",
        "email": "jeel@example.com",
        "age": 25,
        "website": "https://jeel.dev",
    });

    let result = schema.run(&valid_user).await;
    println!("valid user -> valid: {}", result.is_valid());

    let invalid_user = json!({
        "username": "yo",
        "email": "not-an-email",
        "age": 15,
    });

    let result = schema.run(&invalid_user).await;
    println!("invalid user -> valid: {}", result.is_valid());
    for error in result.errors() {
        println!("  {error}");
    }
    println!(
        "\nas JSON:\n{}",
        serde_json::to_string_pretty(&result).expect("result serializes")
    );
}
