//! Shared helpers for GreenBasket integration tests.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//!   (`gb-cli migrate`)
//! - The server running (`cargo run -p greenbasket-server`)
//!
//! Run with: `cargo test -p greenbasket-integration-tests -- --ignored`

#![cfg_attr(not(test), forbid(unsafe_code))]

use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:3000/api".to_string())
}

/// A unique email per test run, so re-runs never collide on the unique
/// index.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@integration.test", Uuid::new_v4().simple())
}

/// Register a fresh user and return `(email, token)`.
///
/// # Panics
///
/// Panics if registration fails - every caller needs it to succeed.
pub async fn register_user(client: &reqwest::Client, prefix: &str) -> (String, String) {
    let email = unique_email(prefix);

    let response = client
        .post(format!("{}/register", api_base_url()))
        .json(&json!({
            "name": "Integration Tester",
            "email": email,
            "phone": "+15558675309",
            "password": "secret1",
        }))
        .send()
        .await
        .expect("register request");

    assert_eq!(response.status(), reqwest::StatusCode::CREATED);
    let body: Value = response.json().await.expect("register body");
    assert_eq!(body["success"], true);

    let token = body["data"]["token"]
        .as_str()
        .expect("token in register response")
        .to_owned();

    (email, token)
}
