//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::tokens::TokenError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] greenbasket_core::EmailError),

    /// Invalid phone format.
    #[error("invalid phone: {0}")]
    InvalidPhone(#[from] greenbasket_core::PhoneError),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// User not found.
    #[error("user not found")]
    UserNotFound,

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// The account exists but has been deactivated.
    #[error("account is deactivated")]
    AccountDeactivated,

    /// Unrecognized login type in the request.
    #[error("invalid login type")]
    InvalidLoginType,

    /// Token issue/verification error.
    #[error("token error: {0}")]
    Token(#[from] TokenError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
