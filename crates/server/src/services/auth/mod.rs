//! Authentication service.
//!
//! Owns the login/registration flows (email + social), password hashing,
//! and the forgot-password and refresh-token operations. Route handlers
//! stay thin; everything that touches more than one repository call or a
//! credential lives here.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use greenbasket_core::api::{LoginRequest, RegisterRequest};
use greenbasket_core::{Email, Phone};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::user::{NewUser, User};
use crate::services::tokens::{IssuedToken, TokenService};

/// Minimum password length, matched by client-side validation.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    tokens: &'a TokenService,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, tokens: &'a TokenService) -> Self {
        Self {
            users: UserRepository::new(pool),
            tokens,
        }
    }

    /// Register a new user with name, email, phone, and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail`/`InvalidPhone` if a field fails to
    /// parse, `AuthError::UserAlreadyExists` if the email is taken, and
    /// `AuthError::PasswordHash` if hashing fails.
    pub async fn register(
        &self,
        request: &RegisterRequest,
    ) -> Result<(User, IssuedToken), AuthError> {
        let email = Email::parse(&request.email)?;
        let phone = Phone::parse(&request.phone)?;
        validate_password(&request.password)?;

        let password_hash = hash_password(&request.password)?;

        // Explicit existence check so the caller gets "User already exists"
        // rather than a generic conflict; the unique index still backstops
        // concurrent registrations.
        if self.users.get_by_email(&email).await?.is_some() {
            return Err(AuthError::UserAlreadyExists);
        }

        let user = self
            .users
            .create(NewUser {
                name: request.name.trim().to_owned(),
                email,
                phone: Some(phone),
                password_hash: Some(password_hash),
                facebook_id: None,
                apple_id: None,
                notification_token: request.notification_token.clone(),
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        let token = self.tokens.issue_access(user.id)?;
        Ok((user, token))
    }

    /// Log a user in.
    ///
    /// Dispatches on `login_type`: `"email"` verifies the password,
    /// `"facebook"`/`"apple"` find or create an account keyed by the
    /// provider id.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for a wrong email/password,
    /// `AuthError::AccountDeactivated` for inactive accounts, and
    /// `AuthError::InvalidLoginType` for unknown types.
    pub async fn login(&self, request: &LoginRequest) -> Result<(User, IssuedToken), AuthError> {
        let user = match request.login_type.as_str() {
            "email" => self.login_with_email(request).await?,
            "facebook" => {
                let facebook_id = request
                    .facebook_id
                    .as_deref()
                    .ok_or(AuthError::InvalidLoginType)?;
                match self.users.get_by_facebook_id(facebook_id).await? {
                    Some(user) => user,
                    None => {
                        self.create_social_user(request, Some(facebook_id), None)
                            .await?
                    }
                }
            }
            "apple" => {
                let apple_id = request
                    .apple_id
                    .as_deref()
                    .ok_or(AuthError::InvalidLoginType)?;
                match self.users.get_by_apple_id(apple_id).await? {
                    Some(user) => user,
                    None => self.create_social_user(request, None, Some(apple_id)).await?,
                }
            }
            _ => return Err(AuthError::InvalidLoginType),
        };

        if !user.is_active {
            return Err(AuthError::AccountDeactivated);
        }

        let token = self.tokens.issue_access(user.id)?;
        Ok((user, token))
    }

    /// Handle a forgot-password request.
    ///
    /// Sending the reset email is out of band; this verifies the account
    /// exists and logs the request.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` for unknown emails.
    pub async fn forgot_password(&self, email: &str) -> Result<(), AuthError> {
        let email = Email::parse(email)?;
        let user = self
            .users
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        tracing::info!(user_id = %user.id, "password reset requested");
        Ok(())
    }

    /// Exchange a refresh token for a fresh access/refresh pair.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Token` if the refresh token fails verification
    /// and `AuthError::UserNotFound` if the subject no longer exists.
    pub async fn refresh(
        &self,
        refresh_token: &str,
    ) -> Result<(IssuedToken, IssuedToken), AuthError> {
        let user_id = self.tokens.verify_refresh(refresh_token)?;

        let user = self
            .users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let access = self.tokens.issue_access(user.id)?;
        let refresh = self.tokens.issue_refresh(user.id)?;
        Ok((access, refresh))
    }

    async fn login_with_email(&self, request: &LoginRequest) -> Result<User, AuthError> {
        let email = request
            .email
            .as_deref()
            .ok_or(AuthError::InvalidCredentials)?;
        let password = request
            .password
            .as_deref()
            .ok_or(AuthError::InvalidCredentials)?;

        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;
        Ok(user)
    }

    /// First social login creates the account.
    async fn create_social_user(
        &self,
        request: &LoginRequest,
        facebook_id: Option<&str>,
        apple_id: Option<&str>,
    ) -> Result<User, AuthError> {
        let email = Email::parse(request.email.as_deref().unwrap_or_default())?;
        let name = request.name.clone().unwrap_or_default();

        let user = self
            .users
            .create(NewUser {
                name,
                email,
                phone: None,
                password_hash: None,
                facebook_id: facebook_id.map(str::to_owned),
                apple_id: apple_id.map(str::to_owned),
                notification_token: request.notification_token.clone(),
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "created account via social login");
        Ok(user)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("secret1").unwrap();
        assert!(verify_password("secret1", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong-password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("secret1").unwrap();
        let b = hash_password("secret1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_validate_password_too_short() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
    }
}
