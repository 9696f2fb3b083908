//! Unified error handling.
//!
//! Provides a unified `ApiError` type that maps every failure onto the JSON
//! envelope `{success: false, error, ...}` with the right status code. All
//! route handlers should return `Result<T, ApiError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::tokens::TokenError;
use crate::validation::FieldError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Request body failed field validation.
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Caller is not authenticated.
    #[error("{0}")]
    Unauthorized(String),

    /// Caller is authenticated but not allowed.
    #[error("{0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("{0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(err) => match err {
                RepositoryError::Conflict(_) => StatusCode::BAD_REQUEST,
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::AccountDeactivated => {
                    StatusCode::UNAUTHORIZED
                }
                AuthError::UserNotFound => StatusCode::NOT_FOUND,
                AuthError::UserAlreadyExists
                | AuthError::InvalidLoginType
                | AuthError::WeakPassword(_)
                | AuthError::InvalidEmail(_)
                | AuthError::InvalidPhone(_) => StatusCode::BAD_REQUEST,
                AuthError::Token(TokenError::Expired) => StatusCode::UNAUTHORIZED,
                AuthError::Token(_) => StatusCode::FORBIDDEN,
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The client-facing error string. Internal details are never exposed.
    fn client_error(&self) -> String {
        match self {
            Self::Database(err) => match err {
                RepositoryError::Conflict(msg) => {
                    let mut msg = msg.clone();
                    if let Some(first) = msg.get_mut(0..1) {
                        first.make_ascii_uppercase();
                    }
                    msg
                }
                RepositoryError::NotFound => "Not found".to_string(),
                _ => "Something went wrong!".to_string(),
            },
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid credentials".to_string(),
                AuthError::UserNotFound => "User not found".to_string(),
                AuthError::UserAlreadyExists => "User already exists".to_string(),
                AuthError::AccountDeactivated => "Account is deactivated".to_string(),
                AuthError::InvalidLoginType => "Invalid login type".to_string(),
                AuthError::WeakPassword(msg) => msg.clone(),
                AuthError::InvalidEmail(_) => "Please provide a valid email".to_string(),
                AuthError::InvalidPhone(_) => "Please provide a valid phone number".to_string(),
                AuthError::Token(TokenError::Expired) => "Token expired".to_string(),
                AuthError::Token(_) => "Invalid token".to_string(),
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    "Something went wrong!".to_string()
                }
            },
            Self::Validation(_) => "Validation failed".to_string(),
            Self::NotFound(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::BadRequest(msg) => msg.clone(),
            Self::Internal(_) => "Something went wrong!".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Log server-side failures with their real cause before it is
        // replaced by the generic client message.
        if self.status() == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request error");
        }

        let status = self.status();
        let body = match &self {
            Self::Validation(errors) => json!({
                "success": false,
                "error": "Validation failed",
                "errors": errors,
            }),
            _ => json!({
                "success": false,
                "error": self.client_error(),
            }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_auth_error_statuses() {
        assert_eq!(
            status_of(ApiError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(ApiError::Auth(AuthError::UserAlreadyExists)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ApiError::Auth(AuthError::UserNotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ApiError::Auth(AuthError::Token(TokenError::Expired))),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(ApiError::Auth(AuthError::Token(TokenError::Malformed))),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_client_error_strings() {
        assert_eq!(
            ApiError::Auth(AuthError::InvalidCredentials).client_error(),
            "Invalid credentials"
        );
        assert_eq!(
            ApiError::Auth(AuthError::UserAlreadyExists).client_error(),
            "User already exists"
        );
        assert_eq!(
            ApiError::Auth(AuthError::Token(TokenError::Expired)).client_error(),
            "Token expired"
        );
    }

    #[test]
    fn test_internal_details_not_exposed() {
        let err = ApiError::Internal("connection pool exhausted".to_string());
        assert_eq!(err.client_error(), "Something went wrong!");
    }

    #[test]
    fn test_validation_status() {
        let err = ApiError::Validation(vec![FieldError::new("email", "Please provide a valid email")]);
        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
    }
}
