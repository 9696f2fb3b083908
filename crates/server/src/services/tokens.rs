//! JWT issue and verification.
//!
//! Access tokens are signed with the configured secret; refresh tokens use a
//! derived secret (`<secret>_refresh`) and a longer lifetime, so an access
//! token can never pass as a refresh token or vice versa.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use greenbasket_core::UserId;

use crate::config::ServerConfig;

/// Errors from token operations.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token's expiry has passed.
    #[error("token expired")]
    Expired,

    /// The token is not a well-formed, correctly signed JWT.
    #[error("invalid token")]
    Malformed,

    /// Verification failed for another reason.
    #[error("token verification failed: {0}")]
    Verification(String),

    /// Signing failed.
    #[error("token creation failed: {0}")]
    Creation(String),
}

/// JWT claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated user's id.
    #[serde(rename = "userId")]
    pub user_id: i32,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
}

/// A freshly signed token with its expiry.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies bearer tokens.
pub struct TokenService {
    secret: SecretString,
    access_lifetime: Duration,
    refresh_lifetime: Duration,
}

impl TokenService {
    /// Create a token service from configuration.
    #[must_use]
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            config.jwt_secret.clone(),
            Duration::days(config.jwt_expires_in_days),
            Duration::days(config.jwt_refresh_expires_in_days),
        )
    }

    /// Create a token service with explicit lifetimes.
    #[must_use]
    pub const fn new(
        secret: SecretString,
        access_lifetime: Duration,
        refresh_lifetime: Duration,
    ) -> Self {
        Self {
            secret,
            access_lifetime,
            refresh_lifetime,
        }
    }

    /// Issue an access token for a user.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Creation` if signing fails.
    pub fn issue_access(&self, user_id: UserId) -> Result<IssuedToken, TokenError> {
        self.issue(user_id, self.access_lifetime, self.secret.expose_secret())
    }

    /// Issue a refresh token for a user.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Creation` if signing fails.
    pub fn issue_refresh(&self, user_id: UserId) -> Result<IssuedToken, TokenError> {
        self.issue(user_id, self.refresh_lifetime, &self.refresh_secret())
    }

    /// Verify an access token and return the user id it identifies.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Expired` if the token's expiry has passed,
    /// `TokenError::Malformed` for anything that is not a valid signed JWT,
    /// and `TokenError::Verification` for other failures.
    pub fn verify_access(&self, token: &str) -> Result<UserId, TokenError> {
        Self::verify(token, self.secret.expose_secret())
    }

    /// Verify a refresh token and return the user id it identifies.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::verify_access`].
    pub fn verify_refresh(&self, token: &str) -> Result<UserId, TokenError> {
        Self::verify(token, &self.refresh_secret())
    }

    fn refresh_secret(&self) -> String {
        format!("{}_refresh", self.secret.expose_secret())
    }

    fn issue(
        &self,
        user_id: UserId,
        lifetime: Duration,
        secret: &str,
    ) -> Result<IssuedToken, TokenError> {
        let now = Utc::now();
        let expires_at = now + lifetime;

        let claims = Claims {
            user_id: user_id.as_i32(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| TokenError::Creation(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    fn verify(token: &str, secret: &str) -> Result<UserId, TokenError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(map_jwt_error)?;

        Ok(UserId::new(data.claims.user_id))
    }
}

/// Collapse jsonwebtoken's error kinds into our three verification outcomes.
fn map_jwt_error(e: jsonwebtoken::errors::Error) -> TokenError {
    use jsonwebtoken::errors::ErrorKind;

    match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidToken
        | ErrorKind::InvalidSignature
        | ErrorKind::InvalidAlgorithm
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_) => TokenError::Malformed,
        _ => TokenError::Verification(e.to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(
            SecretString::from("unit-test-signing-key-0123456789"),
            Duration::days(7),
            Duration::days(30),
        )
    }

    #[test]
    fn test_access_roundtrip() {
        let svc = service();
        let issued = svc.issue_access(UserId::new(42)).unwrap();

        let user_id = svc.verify_access(&issued.token).unwrap();
        assert_eq!(user_id, UserId::new(42));
        assert!(issued.expires_at > Utc::now());
    }

    #[test]
    fn test_refresh_roundtrip() {
        let svc = service();
        let issued = svc.issue_refresh(UserId::new(7)).unwrap();

        let user_id = svc.verify_refresh(&issued.token).unwrap();
        assert_eq!(user_id, UserId::new(7));
    }

    #[test]
    fn test_access_token_rejected_as_refresh() {
        // Different derived secret, so the signature cannot match.
        let svc = service();
        let issued = svc.issue_access(UserId::new(1)).unwrap();

        assert!(matches!(
            svc.verify_refresh(&issued.token),
            Err(TokenError::Malformed)
        ));
    }

    #[test]
    fn test_expired_token() {
        // Lifetime well past the default 60s validation leeway.
        let svc = TokenService::new(
            SecretString::from("unit-test-signing-key-0123456789"),
            Duration::hours(-2),
            Duration::days(30),
        );
        let issued = svc.issue_access(UserId::new(1)).unwrap();

        assert!(matches!(
            svc.verify_access(&issued.token),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn test_garbage_token() {
        let svc = service();
        assert!(matches!(
            svc.verify_access("not-a-jwt"),
            Err(TokenError::Malformed)
        ));
    }

    #[test]
    fn test_wrong_secret() {
        let svc = service();
        let other = TokenService::new(
            SecretString::from("a-completely-different-signing-key"),
            Duration::days(7),
            Duration::days(30),
        );

        let issued = other.issue_access(UserId::new(9)).unwrap();
        assert!(matches!(
            svc.verify_access(&issued.token),
            Err(TokenError::Malformed)
        ));
    }
}
