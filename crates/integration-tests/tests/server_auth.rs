//! Integration tests for the auth flow.
//!
//! Requires a running server and database; see the crate docs.

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use greenbasket_integration_tests::{api_base_url, register_user, unique_email};

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn register_then_login_roundtrip() {
    let client = Client::new();
    let (email, _token) = register_user(&client, "login").await;

    let response = client
        .post(format!("{}/login", api_base_url()))
        .json(&json!({
            "type": "email",
            "email": email,
            "password": "secret1",
        }))
        .send()
        .await
        .expect("login request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("login body");
    assert_eq!(body["success"], true);
    assert!(body["data"]["token"].as_str().is_some());
    assert_eq!(body["data"]["email"], email);
    assert_eq!(body["data"]["is_Active"], true);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn login_with_wrong_password_is_401() {
    let client = Client::new();
    let (email, _token) = register_user(&client, "wrongpw").await;

    let response = client
        .post(format!("{}/login", api_base_url()))
        .json(&json!({
            "type": "email",
            "email": email,
            "password": "not-the-password",
        }))
        .send()
        .await
        .expect("login request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.expect("login body");
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn duplicate_registration_is_400_user_already_exists() {
    let client = Client::new();
    let (email, _token) = register_user(&client, "dup").await;

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

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("register body");
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "User already exists");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn register_with_invalid_fields_lists_field_errors() {
    let client = Client::new();

    let response = client
        .post(format!("{}/register", api_base_url()))
        .json(&json!({
            "name": "A",
            "email": "nope",
            "phone": "1",
            "password": "123",
        }))
        .send()
        .await
        .expect("register request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("register body");
    assert_eq!(body["error"], "Validation failed");
    assert!(body["errors"].as_array().is_some_and(|a| a.len() == 4));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn protected_endpoint_without_token_is_401() {
    let client = Client::new();

    let response = client
        .get(format!("{}/user/profile", api_base_url()))
        .send()
        .await
        .expect("profile request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.expect("profile body");
    assert_eq!(body["error"], "Access token required");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn protected_endpoint_with_malformed_token_is_403() {
    let client = Client::new();

    let response = client
        .get(format!("{}/user/profile", api_base_url()))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .expect("profile request");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = response.json().await.expect("profile body");
    assert_eq!(body["error"], "Invalid token");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn logout_with_valid_token_succeeds() {
    let client = Client::new();
    let (_email, token) = register_user(&client, "logout").await;

    let response = client
        .post(format!("{}/logout", api_base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("logout request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("logout body");
    assert_eq!(body["message"], "Logged out successfully");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn forgot_password_unknown_email_is_404() {
    let client = Client::new();

    let response = client
        .post(format!("{}/forgot-password", api_base_url()))
        .json(&json!({ "email": unique_email("ghost") }))
        .send()
        .await
        .expect("forgot-password request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.expect("body");
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn refresh_token_requires_body_value() {
    let client = Client::new();

    let response = client
        .post(format!("{}/refresh-token", api_base_url()))
        .json(&json!({}))
        .send()
        .await
        .expect("refresh request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("body");
    assert_eq!(body["error"], "Refresh token required");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn refresh_token_rejects_access_token() {
    let client = Client::new();
    let (_email, token) = register_user(&client, "refresh").await;

    // An access token signed with the access secret cannot pass as a
    // refresh token.
    let response = client
        .post(format!("{}/refresh-token", api_base_url()))
        .json(&json!({ "refreshToken": token }))
        .send()
        .await
        .expect("refresh request");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = response.json().await.expect("body");
    assert_eq!(body["error"], "Invalid refresh token");
}
