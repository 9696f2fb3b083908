//! Router-level tests that run without a database.
//!
//! The pool is created lazily and never connected; every request here is
//! resolved before a handler touches it (auth rejections, fallback, health).

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use chrono::Duration;
use secrecy::SecretString;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use greenbasket_core::UserId;
use greenbasket_server::app;
use greenbasket_server::config::ServerConfig;
use greenbasket_server::services::tokens::TokenService;
use greenbasket_server::state::AppState;

const TEST_SECRET: &str = "router-test-signing-key-0123456789";

fn test_state() -> AppState {
    let config = ServerConfig {
        database_url: SecretString::from("postgres://localhost/greenbasket_test"),
        host: "127.0.0.1".parse().expect("valid host"),
        port: 0,
        jwt_secret: SecretString::from(TEST_SECRET),
        jwt_expires_in_days: 7,
        jwt_refresh_expires_in_days: 30,
    };

    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://localhost/greenbasket_test")
        .expect("lazy pool");

    AppState::new(config, pool)
}

async fn body_json(body: Body) -> Value {
    let bytes = to_bytes(body, usize::MAX).await.expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn health_returns_success_envelope() {
    let app = app(test_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Server is running");
}

#[tokio::test]
async fn unknown_route_returns_404_envelope() {
    let app = app(test_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/not-a-thing")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Endpoint not found");
}

#[tokio::test]
async fn protected_route_without_token_is_401() {
    let app = app(test_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/user/profile")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Access token required");
}

#[tokio::test]
async fn protected_route_with_expired_token_is_401() {
    let app = app(test_state());

    // Same secret as the server, lifetime in the past.
    let expired_issuer = TokenService::new(
        SecretString::from(TEST_SECRET),
        Duration::hours(-2),
        Duration::days(30),
    );
    let token = expired_issuer
        .issue_access(UserId::new(1))
        .expect("issue token");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/user/profile")
                .header(header::AUTHORIZATION, format!("Bearer {}", token.token))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["error"], "Token expired");
}

#[tokio::test]
async fn protected_route_with_malformed_token_is_403() {
    let app = app(test_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/user/profile")
                .header(header::AUTHORIZATION, "Bearer not.a.jwt")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["error"], "Invalid token");
}

#[tokio::test]
async fn logout_confirms_valid_token_without_database() {
    let app = app(test_state());

    let issuer = TokenService::new(
        SecretString::from(TEST_SECRET),
        Duration::days(7),
        Duration::days(30),
    );
    let token = issuer.issue_access(UserId::new(42)).expect("issue token");

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/logout")
                .header(header::AUTHORIZATION, format!("Bearer {}", token.token))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Logged out successfully");
}
