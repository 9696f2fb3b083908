//! User domain types.
//!
//! These types represent validated domain objects separate from database row
//! types. The password hash never leaves the repository layer.

use chrono::{DateTime, Utc};

use greenbasket_core::api::{Address, ProfileDoc};
use greenbasket_core::{Email, Phone, ProductId, UserId};

/// A storefront user (domain type).
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address (unique, lowercased).
    pub email: Email,
    /// Phone number (absent for social-login accounts).
    pub phone: Option<Phone>,
    /// Facebook account id, for social login.
    pub facebook_id: Option<String>,
    /// Apple account id, for social login.
    pub apple_id: Option<String>,
    /// Device push-notification token captured at login/registration.
    pub notification_token: Option<String>,
    /// Whether the account is active. Deactivated accounts cannot log in.
    pub is_active: bool,
    /// Saved addresses.
    pub addresses: Vec<Address>,
    /// Wishlisted product ids.
    pub wishlist: Vec<ProductId>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The user document sent over the wire ("user minus password").
    #[must_use]
    pub fn to_profile(&self) -> ProfileDoc {
        ProfileDoc {
            user_id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            notification_token: self.notification_token.clone(),
            is_active: self.is_active,
            addresses: self.addresses.clone(),
            wishlist: self.wishlist.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Parameters for creating a user.
///
/// Covers both registration (`password_hash` set) and first social login
/// (`facebook_id`/`apple_id` set, no password).
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub phone: Option<Phone>,
    pub password_hash: Option<String>,
    pub facebook_id: Option<String>,
    pub apple_id: Option<String>,
    pub notification_token: Option<String>,
}
