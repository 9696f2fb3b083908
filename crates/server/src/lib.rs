//! GreenBasket server library.
//!
//! This crate provides the REST API as a library, allowing the router to be
//! built in tests and reused by the binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
pub mod validation;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Json, Router, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the full application router.
#[must_use]
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api", routes::routes())
        .fallback(not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // The mobile client runs from a different origin during development.
        .layer(CorsLayer::permissive())
}

/// Liveness health check endpoint.
///
/// Returns a success envelope if the server is running. Does not check
/// dependencies.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "success": true, "message": "Server is running" }))
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// JSON 404 for unmatched routes.
async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "success": false, "error": "Endpoint not found" })),
    )
}
