//! Authentication extractors.
//!
//! Identity is resolved from the bearer token into a typed value consumed by
//! handlers; nothing is attached to the request by mutation. Two composable
//! guards cover the required/optional duality:
//!
//! - [`RequireIdentity`] rejects the request unless a valid token is present
//! - [`OptionalIdentity`] never rejects, carrying `Option<Identity>`
//!
//! Rejection state machine over a request:
//! no token -> 401; expired -> 401; malformed -> 403; other failure -> 403.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use greenbasket_core::UserId;

use crate::services::tokens::{TokenError, TokenService};
use crate::state::AppState;

/// The authenticated caller, as proven by their access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    /// The user the token identifies.
    pub user_id: UserId,
}

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireIdentity(identity): RequireIdentity,
/// ) -> impl IntoResponse {
///     format!("Hello, user {}!", identity.user_id)
/// }
/// ```
pub struct RequireIdentity(pub Identity);

/// Extractor that resolves identity when a valid token is present but never
/// rejects. Used by endpoints that personalize without requiring login.
pub struct OptionalIdentity(pub Option<Identity>);

/// Why a request failed authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// No Authorization header / no bearer token.
    MissingToken,
    /// Token expiry has passed.
    Expired,
    /// Token is not a well-formed, correctly signed JWT.
    Malformed,
    /// Verification failed for another reason.
    VerificationFailed,
}

impl AuthRejection {
    const fn status(self) -> StatusCode {
        match self {
            Self::MissingToken | Self::Expired => StatusCode::UNAUTHORIZED,
            Self::Malformed | Self::VerificationFailed => StatusCode::FORBIDDEN,
        }
    }

    const fn error(self) -> &'static str {
        match self {
            Self::MissingToken => "Access token required",
            Self::Expired => "Token expired",
            Self::Malformed => "Invalid token",
            Self::VerificationFailed => "Token verification failed",
        }
    }

    const fn message(self) -> &'static str {
        match self {
            Self::MissingToken => "Please provide a valid authentication token",
            Self::Expired => "Your session has expired. Please login again.",
            Self::Malformed => "Invalid authentication token.",
            Self::VerificationFailed => "Failed to authenticate token.",
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = json!({
            "success": false,
            "error": self.error(),
            "message": self.message(),
        });
        (self.status(), Json(body)).into_response()
    }
}

/// Resolve an `Authorization` header value into an identity.
///
/// Pure over its inputs so the full rejection matrix is unit-testable
/// without building a request.
///
/// # Errors
///
/// Returns the appropriate [`AuthRejection`] when the header is absent or
/// the token fails verification.
pub fn authorize(
    auth_header: Option<&str>,
    tokens: &TokenService,
) -> Result<Identity, AuthRejection> {
    let token = auth_header
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .ok_or(AuthRejection::MissingToken)?;

    match tokens.verify_access(token) {
        Ok(user_id) => Ok(Identity { user_id }),
        Err(TokenError::Expired) => Err(AuthRejection::Expired),
        Err(TokenError::Malformed) => Err(AuthRejection::Malformed),
        Err(e) => {
            tracing::debug!(error = %e, "token verification failed");
            Err(AuthRejection::VerificationFailed)
        }
    }
}

fn auth_header(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}

impl FromRequestParts<AppState> for RequireIdentity {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authorize(auth_header(parts), state.tokens()).map(Self)
    }
}

impl FromRequestParts<AppState> for OptionalIdentity {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(authorize(auth_header(parts), state.tokens()).ok()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;
    use secrecy::SecretString;

    fn tokens() -> TokenService {
        TokenService::new(
            SecretString::from("unit-test-signing-key-0123456789"),
            Duration::days(7),
            Duration::days(30),
        )
    }

    #[test]
    fn test_valid_token() {
        let svc = tokens();
        let issued = svc.issue_access(UserId::new(5)).unwrap();
        let header = format!("Bearer {}", issued.token);

        let identity = authorize(Some(&header), &svc).unwrap();
        assert_eq!(identity.user_id, UserId::new(5));
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(
            authorize(None, &tokens()).unwrap_err(),
            AuthRejection::MissingToken
        );
    }

    #[test]
    fn test_header_without_bearer_scheme() {
        assert_eq!(
            authorize(Some("Token abc"), &tokens()).unwrap_err(),
            AuthRejection::MissingToken
        );
    }

    #[test]
    fn test_empty_bearer() {
        assert_eq!(
            authorize(Some("Bearer "), &tokens()).unwrap_err(),
            AuthRejection::MissingToken
        );
    }

    #[test]
    fn test_expired_token() {
        let expired = TokenService::new(
            SecretString::from("unit-test-signing-key-0123456789"),
            Duration::hours(-2),
            Duration::days(30),
        );
        let issued = expired.issue_access(UserId::new(1)).unwrap();
        let header = format!("Bearer {}", issued.token);

        assert_eq!(
            authorize(Some(&header), &tokens()).unwrap_err(),
            AuthRejection::Expired
        );
    }

    #[test]
    fn test_malformed_token() {
        assert_eq!(
            authorize(Some("Bearer definitely.not.ajwt"), &tokens()).unwrap_err(),
            AuthRejection::Malformed
        );
    }

    #[test]
    fn test_wrong_signature() {
        let other = TokenService::new(
            SecretString::from("a-completely-different-signing-key"),
            Duration::days(7),
            Duration::days(30),
        );
        let issued = other.issue_access(UserId::new(1)).unwrap();
        let header = format!("Bearer {}", issued.token);

        assert_eq!(
            authorize(Some(&header), &tokens()).unwrap_err(),
            AuthRejection::Malformed
        );
    }

    #[test]
    fn test_rejection_statuses() {
        assert_eq!(
            AuthRejection::MissingToken.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthRejection::Expired.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthRejection::Malformed.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AuthRejection::VerificationFailed.status(),
            StatusCode::FORBIDDEN
        );
    }
}
