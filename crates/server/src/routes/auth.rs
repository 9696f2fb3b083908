//! Authentication route handlers.

use axum::{Json, extract::State, response::Response};
use serde::Deserialize;

use greenbasket_core::api::{
    AuthPayload, ForgotPasswordRequest, LoginRequest, RefreshPayload, RegisterRequest,
};

use crate::error::{ApiError, Result};
use crate::middleware::RequireIdentity;
use crate::models::user::User;
use crate::response;
use crate::services::auth::{AuthError, AuthService};
use crate::services::tokens::IssuedToken;
use crate::state::AppState;
use crate::validation;

fn auth_payload(user: &User, token: &IssuedToken) -> AuthPayload {
    AuthPayload {
        user_id: user.id,
        token: token.token.clone(),
        token_expiration: token.expires_at,
        name: user.name.clone(),
        email: user.email.clone(),
        phone: user.phone.clone(),
        is_active: user.is_active,
    }
}

/// `POST /login`
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Response> {
    validation::validate_login(&body)?;
    validation::social_login_guard(&body)?;

    let service = AuthService::new(state.pool(), state.tokens());
    let (user, token) = service.login(&body).await?;

    tracing::info!(user_id = %user.id, login_type = %body.login_type, "user logged in");
    Ok(response::ok(auth_payload(&user, &token)))
}

/// `POST /register`
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Response> {
    validation::validate_register(&body)?;

    let service = AuthService::new(state.pool(), state.tokens());
    let (user, token) = service.register(&body).await?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok(response::created(auth_payload(&user, &token)))
}

/// `POST /logout`
///
/// Bearer tokens are stateless, so there is nothing to revoke server-side;
/// the endpoint exists so clients have a single call that both confirms the
/// token was still valid and marks the logout in the request log.
pub async fn logout(RequireIdentity(identity): RequireIdentity) -> Response {
    tracing::info!(user_id = %identity.user_id, "user logged out");
    response::message("Logged out successfully")
}

/// `POST /forgot-password`
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(body): Json<ForgotPasswordRequest>,
) -> Result<Response> {
    validation::validate_forgot_password(&body)?;

    let service = AuthService::new(state.pool(), state.tokens());
    service.forgot_password(&body.email).await?;

    Ok(response::message("Password reset instructions sent"))
}

/// `POST /refresh-token` body, with the token optional so a missing field
/// produces our 400 rather than a deserialization rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshBody {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// `POST /refresh-token`
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(body): Json<RefreshBody>,
) -> Result<Response> {
    let refresh_token = body
        .refresh_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Refresh token required".to_owned()))?;

    let service = AuthService::new(state.pool(), state.tokens());
    let (access, refresh) = service.refresh(&refresh_token).await.map_err(|e| match e {
        // Any verification failure collapses to one opaque rejection.
        AuthError::Token(_) => ApiError::Forbidden("Invalid refresh token".to_owned()),
        other => ApiError::Auth(other),
    })?;

    Ok(response::ok(RefreshPayload {
        access_token: access.token,
        token_expiration: access.expires_at,
        refresh_token: refresh.token,
    }))
}
