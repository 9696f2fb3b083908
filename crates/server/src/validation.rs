//! Request-body field validation.
//!
//! Validation failures collect into a 400 response of the shape
//! `{success: false, error: "Validation failed", errors: [{field, message}]}`.
//! Auth, profile, and order validators live here; category and product
//! validators sit next to their route handlers.

use rust_decimal::Decimal;
use serde::Serialize;

use greenbasket_core::api::{
    ForgotPasswordRequest, LoginRequest, PlaceOrderRequest, RegisterRequest, UpdateAddressRequest,
    UpdateProfileRequest,
};
use greenbasket_core::{Email, Phone};

use crate::error::ApiError;

/// One failed field check.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    /// Create a field error.
    #[must_use]
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_owned(),
            message: message.to_owned(),
        }
    }
}

/// Accumulates field errors across a request body.
#[derive(Debug, Default)]
pub struct Checks {
    errors: Vec<FieldError>,
}

impl Checks {
    /// Start a fresh set of checks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure when `ok` is false.
    pub fn ensure(&mut self, ok: bool, field: &str, message: &str) -> &mut Self {
        if !ok {
            self.errors.push(FieldError::new(field, message));
        }
        self
    }

    /// Finish, converting any collected failures into a validation error.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` when any check failed.
    pub fn finish(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self.errors))
        }
    }
}

/// Whether a string parses as an http(s) URL.
#[must_use]
pub fn is_url(s: &str) -> bool {
    url::Url::parse(s)
        .map(|u| u.scheme() == "http" || u.scheme() == "https")
        .unwrap_or(false)
}

/// Validate `POST /login`.
///
/// # Errors
///
/// Returns `ApiError::Validation` listing every failed field.
pub fn validate_login(body: &LoginRequest) -> Result<(), ApiError> {
    let mut checks = Checks::new();

    checks.ensure(
        matches!(body.login_type.as_str(), "email" | "facebook" | "apple"),
        "type",
        "Type must be email, facebook, or apple",
    );

    if body.login_type == "email" {
        checks.ensure(
            body.email
                .as_deref()
                .is_some_and(|e| Email::parse(e).is_ok()),
            "email",
            "Please provide a valid email",
        );
        checks.ensure(
            body.password.as_deref().is_some_and(|p| p.len() >= 6),
            "password",
            "Password must be at least 6 characters long",
        );
    }

    checks.finish()
}

/// The social-login preconditions, rejected with a plain 400 rather than a
/// field-error list.
///
/// # Errors
///
/// Returns `ApiError::BadRequest` naming the missing field.
pub fn social_login_guard(body: &LoginRequest) -> Result<(), ApiError> {
    if body.login_type == "facebook" && body.facebook_id.is_none() {
        return Err(ApiError::BadRequest(
            "Facebook ID is required for Facebook login".to_owned(),
        ));
    }

    if body.login_type == "apple" && body.apple_id.is_none() {
        return Err(ApiError::BadRequest(
            "Apple ID is required for Apple login".to_owned(),
        ));
    }

    if matches!(body.login_type.as_str(), "facebook" | "apple") && body.name.is_none() {
        return Err(ApiError::BadRequest(
            "Name is required for social login".to_owned(),
        ));
    }

    Ok(())
}

/// Validate `POST /register`.
///
/// # Errors
///
/// Returns `ApiError::Validation` listing every failed field.
pub fn validate_register(body: &RegisterRequest) -> Result<(), ApiError> {
    let mut checks = Checks::new();

    checks.ensure(
        body.name.trim().len() >= 2,
        "name",
        "Name must be at least 2 characters long",
    );
    checks.ensure(
        Email::parse(&body.email).is_ok(),
        "email",
        "Please provide a valid email",
    );
    checks.ensure(
        Phone::parse(&body.phone).is_ok(),
        "phone",
        "Please provide a valid phone number",
    );
    checks.ensure(
        body.password.len() >= 6,
        "password",
        "Password must be at least 6 characters long",
    );

    checks.finish()
}

/// Validate `POST /forgot-password`.
///
/// # Errors
///
/// Returns `ApiError::Validation` when the email is invalid.
pub fn validate_forgot_password(body: &ForgotPasswordRequest) -> Result<(), ApiError> {
    let mut checks = Checks::new();
    checks.ensure(
        Email::parse(&body.email).is_ok(),
        "email",
        "Please provide a valid email",
    );
    checks.finish()
}

/// Validate `PUT /user/profile`.
///
/// # Errors
///
/// Returns `ApiError::Validation` listing every failed field.
pub fn validate_update_profile(body: &UpdateProfileRequest) -> Result<(), ApiError> {
    let mut checks = Checks::new();

    if let Some(name) = &body.name {
        checks.ensure(
            name.trim().len() >= 2,
            "name",
            "Name must be at least 2 characters long",
        );
    }
    if let Some(phone) = &body.phone {
        checks.ensure(
            Phone::parse(phone).is_ok(),
            "phone",
            "Please provide a valid phone number",
        );
    }

    checks.finish()
}

/// Validate `PUT /user/address`.
///
/// # Errors
///
/// Returns `ApiError::Validation` listing every failed field.
pub fn validate_addresses(body: &UpdateAddressRequest) -> Result<(), ApiError> {
    let mut checks = Checks::new();

    for (i, address) in body.addresses.iter().enumerate() {
        checks.ensure(
            !address.street.trim().is_empty(),
            &format!("addresses.{i}.street"),
            "Street is required",
        );
        checks.ensure(
            !address.city.trim().is_empty(),
            &format!("addresses.{i}.city"),
            "City is required",
        );
        checks.ensure(
            !address.zip_code.trim().is_empty(),
            &format!("addresses.{i}.zipCode"),
            "Zip code is required",
        );
    }

    checks.finish()
}

/// Validate `POST /orders`.
///
/// # Errors
///
/// Returns `ApiError::Validation` listing every failed field.
pub fn validate_place_order(body: &PlaceOrderRequest) -> Result<(), ApiError> {
    let mut checks = Checks::new();

    checks.ensure(
        !body.products.is_empty(),
        "products",
        "Products array must contain at least one item",
    );

    for (i, line) in body.products.iter().enumerate() {
        checks.ensure(
            line.quantity >= 1,
            &format!("products.{i}.quantity"),
            "Quantity must be at least 1",
        );
        checks.ensure(
            line.price >= Decimal::ZERO,
            &format!("products.{i}.price"),
            "Price must be a positive number",
        );
    }

    checks.ensure(
        body.total_amount >= Decimal::ZERO,
        "totalAmount",
        "Total amount must be a positive number",
    );
    checks.ensure(
        !body.payment_method.trim().is_empty(),
        "paymentMethod",
        "Payment method is required",
    );

    checks.finish()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use greenbasket_core::ProductId;
    use greenbasket_core::api::{Address, OrderLine};

    fn field_errors(result: Result<(), ApiError>) -> Vec<FieldError> {
        match result.unwrap_err() {
            ApiError::Validation(errors) => errors,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_login_valid_email_flow() {
        let body = LoginRequest {
            login_type: "email".to_owned(),
            email: Some("a@b.com".to_owned()),
            password: Some("secret1".to_owned()),
            ..LoginRequest::default()
        };
        assert!(validate_login(&body).is_ok());
    }

    #[test]
    fn test_login_unknown_type() {
        let body = LoginRequest {
            login_type: "github".to_owned(),
            ..LoginRequest::default()
        };
        let errors = field_errors(validate_login(&body));
        assert_eq!(errors[0].field, "type");
    }

    #[test]
    fn test_login_short_password() {
        let body = LoginRequest {
            login_type: "email".to_owned(),
            email: Some("a@b.com".to_owned()),
            password: Some("12345".to_owned()),
            ..LoginRequest::default()
        };
        let errors = field_errors(validate_login(&body));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "password");
    }

    #[test]
    fn test_social_guard_requires_provider_id() {
        let body = LoginRequest {
            login_type: "facebook".to_owned(),
            name: Some("Ada".to_owned()),
            ..LoginRequest::default()
        };
        let err = social_login_guard(&body).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(msg)
            if msg == "Facebook ID is required for Facebook login"));
    }

    #[test]
    fn test_social_guard_requires_name() {
        let body = LoginRequest {
            login_type: "apple".to_owned(),
            apple_id: Some("apple-123".to_owned()),
            ..LoginRequest::default()
        };
        let err = social_login_guard(&body).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(msg)
            if msg == "Name is required for social login"));
    }

    #[test]
    fn test_register_collects_all_failures() {
        let body = RegisterRequest {
            name: "A".to_owned(),
            email: "not-an-email".to_owned(),
            phone: "123".to_owned(),
            password: "12345".to_owned(),
            notification_token: None,
        };
        let errors = field_errors(validate_register(&body));
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["name", "email", "phone", "password"]);
    }

    #[test]
    fn test_register_valid() {
        let body = RegisterRequest {
            name: "Ada Lovelace".to_owned(),
            email: "ada@example.com".to_owned(),
            phone: "+15558675309".to_owned(),
            password: "secret1".to_owned(),
            notification_token: None,
        };
        assert!(validate_register(&body).is_ok());
    }

    #[test]
    fn test_addresses_require_fields() {
        let body = UpdateAddressRequest {
            addresses: vec![Address {
                id: None,
                street: String::new(),
                city: "Lisbon".to_owned(),
                zip_code: "1000-001".to_owned(),
                country: None,
            }],
        };
        let errors = field_errors(validate_addresses(&body));
        assert_eq!(errors[0].field, "addresses.0.street");
    }

    #[test]
    fn test_place_order_empty_products() {
        let body = PlaceOrderRequest {
            products: vec![],
            total_amount: Decimal::ZERO,
            shipping_address: Address {
                id: None,
                street: "1 Way".to_owned(),
                city: "Town".to_owned(),
                zip_code: "00000".to_owned(),
                country: None,
            },
            payment_method: "card".to_owned(),
        };
        let errors = field_errors(validate_place_order(&body));
        assert_eq!(errors[0].field, "products");
    }

    #[test]
    fn test_place_order_zero_quantity() {
        let body = PlaceOrderRequest {
            products: vec![OrderLine {
                product_id: ProductId::new(1),
                quantity: 0,
                price: Decimal::new(999, 2),
                selected_attributes: vec![],
            }],
            total_amount: Decimal::new(999, 2),
            shipping_address: Address {
                id: None,
                street: "1 Way".to_owned(),
                city: "Town".to_owned(),
                zip_code: "00000".to_owned(),
                country: None,
            },
            payment_method: "card".to_owned(),
        };
        let errors = field_errors(validate_place_order(&body));
        assert_eq!(errors[0].field, "products.0.quantity");
    }

    #[test]
    fn test_is_url() {
        assert!(is_url("https://cdn.example.com/img.png"));
        assert!(is_url("http://example.com"));
        assert!(!is_url("ftp://example.com/file"));
        assert!(!is_url("not a url"));
    }
}
