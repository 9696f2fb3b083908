//! Client-side field validation for auth forms.
//!
//! Advisory only: it saves a round trip and drives inline field errors, but
//! the server re-validates everything independently and is the actual
//! defense.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$").expect("valid email regex")
});

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\+?\d{1,4})?\d{7,15}$").expect("valid phone regex"));

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-zA-Z]{3,30}\s*)+$").expect("valid name regex"));

/// Validate an email address.
///
/// # Errors
///
/// Returns the field error message shown to the shopper.
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if EMAIL_RE.is_match(email.trim()) {
        Ok(())
    } else {
        Err("Provide a valid email address")
    }
}

/// Validate a phone number, tolerating spaces, dashes, and parentheses.
///
/// # Errors
///
/// Returns the field error message shown to the shopper.
pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    let cleaned: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();

    if PHONE_RE.is_match(&cleaned) {
        Ok(())
    } else {
        Err("Please enter a valid phone number")
    }
}

/// Validate a full name: alphabetic words of at least 3 letters.
///
/// # Errors
///
/// Returns the field error message shown to the shopper.
pub fn validate_full_name(name: &str) -> Result<(), &'static str> {
    if NAME_RE.is_match(name.trim()) {
        Ok(())
    } else {
        Err("Full name is required")
    }
}

/// Validate a login password (presence only; strength is checked at
/// registration).
///
/// # Errors
///
/// Returns the field error message shown to the shopper.
pub fn validate_login_password(password: &str) -> Result<(), &'static str> {
    if password.is_empty() {
        Err("Password is required")
    } else {
        Ok(())
    }
}

/// Validate a registration password.
///
/// # Errors
///
/// Returns the field error message shown to the shopper.
pub fn validate_registration_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 6 {
        Err("Password must be at least 6 characters long")
    } else {
        Ok(())
    }
}
