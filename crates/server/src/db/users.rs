//! User repository for database operations.
//!
//! Queries use the runtime-checked sqlx API with `FromRow` row types; rows
//! are converted to domain types at the boundary so invalid stored values
//! surface as `DataCorruption` instead of leaking outward.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use greenbasket_core::api::Address;
use greenbasket_core::{Email, Phone, ProductId, UserId};

use super::{RepositoryError, conflict_on_unique};
use crate::models::user::{NewUser, User};

const USER_COLUMNS: &str = "id, name, email, phone, password_hash, facebook_id, apple_id, \
                            notification_token, is_active, addresses, wishlist, created_at, updated_at";

/// Database row for a user.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: i32,
    name: String,
    email: String,
    phone: Option<String>,
    password_hash: Option<String>,
    facebook_id: Option<String>,
    apple_id: Option<String>,
    notification_token: Option<String>,
    is_active: bool,
    addresses: Json<Vec<Address>>,
    wishlist: Json<Vec<ProductId>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    /// Convert a row into the domain type, discarding the password hash.
    fn into_user(self) -> Result<User, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let phone = self
            .phone
            .as_deref()
            .map(Phone::parse)
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid phone in database: {e}"))
            })?;

        Ok(User {
            id: UserId::new(self.id),
            name: self.name,
            email,
            phone,
            facebook_id: self.facebook_id,
            apple_id: self.apple_id,
            notification_token: self.notification_token,
            is_active: self.is_active,
            addresses: self.addresses.0,
            wishlist: self.wishlist.0,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Get a user by their Facebook account id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_facebook_id(
        &self,
        facebook_id: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE facebook_id = $1"
        ))
        .bind(facebook_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Get a user by their Apple account id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_apple_id(&self, apple_id: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE apple_id = $1"
        ))
        .bind(apple_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Get a user together with their password hash, by email.
    ///
    /// Returns `None` if the user doesn't exist or has no password set
    /// (social-login accounts).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let Some(hash) = row.password_hash.clone() else {
            return Ok(None);
        };

        Ok(Some((row.into_user()?, hash)))
    }

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email (or provider id)
    /// already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (name, email, phone, password_hash, facebook_id, apple_id, notification_token) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(new_user.phone.as_ref().map(Phone::as_str))
        .bind(&new_user.password_hash)
        .bind(&new_user.facebook_id)
        .bind(&new_user.apple_id)
        .bind(&new_user.notification_token)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "user"))?;

        row.into_user()
    }

    /// Update profile fields. Absent fields keep their current value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_profile(
        &self,
        id: UserId,
        name: Option<&str>,
        phone: Option<&Phone>,
        is_active: Option<bool>,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users \
             SET name = COALESCE($2, name), \
                 phone = COALESCE($3, phone), \
                 is_active = COALESCE($4, is_active), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(name)
        .bind(phone.map(Phone::as_str))
        .bind(is_active)
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)?.into_user()
    }

    /// Replace the user's address list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_addresses(
        &self,
        id: UserId,
        addresses: &[Address],
    ) -> Result<Vec<Address>, RepositoryError> {
        let row: Option<(Json<Vec<Address>>,)> = sqlx::query_as(
            "UPDATE users SET addresses = $2, updated_at = now() WHERE id = $1 RETURNING addresses",
        )
        .bind(id)
        .bind(Json(addresses))
        .fetch_optional(self.pool)
        .await?;

        row.map(|(addresses,)| addresses.0)
            .ok_or(RepositoryError::NotFound)
    }

    /// Replace the user's wishlist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_wishlist(
        &self,
        id: UserId,
        wishlist: &[ProductId],
    ) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE users SET wishlist = $2, updated_at = now() WHERE id = $1")
                .bind(id)
                .bind(Json(wishlist))
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
