//! Wire payloads shared by the server and the client.
//!
//! Every response body travels inside the envelope
//! `{success, data?, error?, message?}`; the types here are the `data`
//! payloads and the request bodies both sides agree on. Field names follow
//! the mobile API's camelCase convention (with the historical `is_Active`
//! exception, which shipped clients already depend on).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, Email, OrderId, Phone, ProductId, UserId};

// =============================================================================
// Auth
// =============================================================================

/// Successful login/registration payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    /// Authenticated user's ID.
    pub user_id: UserId,
    /// Bearer access token.
    pub token: String,
    /// When the access token expires.
    pub token_expiration: DateTime<Utc>,
    /// User's display name.
    pub name: String,
    /// User's email address.
    pub email: Email,
    /// User's phone number (absent for social-login accounts created
    /// without one).
    pub phone: Option<Phone>,
    /// Whether the account is active.
    #[serde(rename = "is_Active")]
    pub is_active: bool,
}

/// Payload returned by `POST /refresh-token`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshPayload {
    pub access_token: String,
    pub refresh_token: String,
    pub token_expiration: DateTime<Utc>,
}

/// Body of `POST /login`.
///
/// `login_type` selects the flow: `"email"` requires `email` + `password`;
/// `"facebook"`/`"apple"` require the provider id and a display name.
/// Unknown types are rejected by server-side validation, not by serde, so
/// the error message stays under our control.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(rename = "type")]
    pub login_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apple_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Device push-notification token, when permission was already granted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_token: Option<String>,
}

/// Body of `POST /register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_token: Option<String>,
}

/// Body of `POST /forgot-password`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Body of `POST /refresh-token`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

// =============================================================================
// User
// =============================================================================

/// A shipping/billing address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Server-assigned id, used by `DELETE /user/address/:id`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub street: String,
    pub city: String,
    pub zip_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// The user document, minus the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDoc {
    pub user_id: UserId,
    pub name: String,
    pub email: Email,
    pub phone: Option<Phone>,
    pub notification_token: Option<String>,
    #[serde(rename = "is_Active")]
    pub is_active: bool,
    #[serde(default)]
    pub addresses: Vec<Address>,
    #[serde(default)]
    pub wishlist: Vec<ProductId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `PUT /user/profile`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "is_Active", skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Body of `PUT /user/address` (wholesale replace).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAddressRequest {
    pub addresses: Vec<Address>,
}

/// Body of `POST /user/wishlist/add` and `/user/wishlist/remove`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistRequest {
    pub product_id: ProductId,
}

// =============================================================================
// Catalog
// =============================================================================

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDoc {
    pub id: CategoryId,
    pub title: String,
    pub description: Option<String>,
    pub image: String,
    pub is_active: bool,
    pub sort_order: i32,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One selectable attribute on a product (e.g. "Size"), with its options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductAttribute {
    pub attribute_id: String,
    pub title: String,
    pub options: Vec<AttributeOption>,
}

/// One option of a [`ProductAttribute`], carrying its own price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeOption {
    pub option_id: String,
    pub title: String,
    pub price: Decimal,
}

/// An attribute/option pair the shopper selected for a line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedAttribute {
    pub attribute_id: String,
    pub title: String,
    pub option: AttributeOption,
}

/// A product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDoc {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub original_price: Option<Decimal>,
    pub image: String,
    pub category: CategoryId,
    pub category_name: String,
    pub stock_quantity: i32,
    pub sku: Option<String>,
    pub featured: bool,
    pub in_stock: bool,
    pub is_active: bool,
    #[serde(default)]
    pub attributes: Vec<ProductAttribute>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Paging envelope attached to product listings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_products: u64,
}

// =============================================================================
// Orders
// =============================================================================

/// Order lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// The wire/storage form of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse a status from its wire/storage form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "processing" => Some(Self::Processing),
            "shipped" => Some(Self::Shipped),
            "delivered" => Some(Self::Delivered),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: Decimal,
    #[serde(default)]
    pub selected_attributes: Vec<SelectedAttribute>,
}

/// An order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDoc {
    pub id: OrderId,
    pub user_id: UserId,
    pub products: Vec<OrderLine>,
    pub total_amount: Decimal,
    pub shipping_address: Address,
    pub payment_method: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub products: Vec<OrderLine>,
    pub total_amount: Decimal,
    pub shipping_address: Address,
    pub payment_method: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_payload_wire_names() {
        let payload = AuthPayload {
            user_id: UserId::new(1),
            token: "tok".to_owned(),
            token_expiration: Utc::now(),
            name: "Ada".to_owned(),
            email: Email::parse("ada@example.com").unwrap(),
            phone: None,
            is_active: true,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["userId"], 1);
        assert_eq!(json["is_Active"], true);
        assert!(json.get("tokenExpiration").is_some());
    }

    #[test]
    fn test_login_request_omits_absent_fields() {
        let req = LoginRequest {
            login_type: "email".to_owned(),
            email: Some("a@b.com".to_owned()),
            password: Some("secret1".to_owned()),
            ..LoginRequest::default()
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["type"], "email");
        assert!(json.get("facebookId").is_none());
        assert!(json.get("notificationToken").is_none());
    }

    #[test]
    fn test_order_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Pending).unwrap(),
            "\"pending\""
        );
        let parsed: OrderStatus = serde_json::from_str("\"shipped\"").unwrap();
        assert_eq!(parsed, OrderStatus::Shipped);
    }

    #[test]
    fn test_order_status_str_roundtrip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::parse("refunded"), None);
    }

    #[test]
    fn test_order_line_defaults_attributes() {
        let parsed: OrderLine =
            serde_json::from_str(r#"{"productId":3,"quantity":2,"price":"9.99"}"#).unwrap();
        assert_eq!(parsed.product_id, ProductId::new(3));
        assert!(parsed.selected_attributes.is_empty());
    }
}
