//! Phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input contains characters other than digits, separators, or a leading +.
    #[error("phone number contains invalid characters")]
    InvalidCharacters,
    /// The digit count is outside the accepted range.
    #[error("phone number must have between {min} and {max} digits")]
    BadLength {
        /// Minimum digits.
        min: usize,
        /// Maximum digits.
        max: usize,
    },
}

/// A phone number in loose international form.
///
/// Mobile keyboards produce numbers with spaces, dashes, and parentheses;
/// those separators are stripped on parse. What remains must be 7-15 digits
/// with an optional leading `+`.
///
/// ## Examples
///
/// ```
/// use greenbasket_core::Phone;
///
/// let phone = Phone::parse("+1 (555) 867-5309").unwrap();
/// assert_eq!(phone.as_str(), "+15558675309");
///
/// assert!(Phone::parse("12345").is_err());    // too short
/// assert!(Phone::parse("call me").is_err());  // not a number
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Minimum number of digits.
    pub const MIN_DIGITS: usize = 7;
    /// Maximum number of digits.
    pub const MAX_DIGITS: usize = 15;

    /// Parse a `Phone` from a string, stripping common separators.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, contains characters other
    /// than digits/separators/a leading `+`, or has fewer than 7 or more
    /// than 15 digits.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PhoneError::Empty);
        }

        let mut normalized = String::with_capacity(trimmed.len());
        for (i, c) in trimmed.chars().enumerate() {
            match c {
                '+' if i == 0 => normalized.push(c),
                '0'..='9' => normalized.push(c),
                ' ' | '-' | '(' | ')' | '.' => {}
                _ => return Err(PhoneError::InvalidCharacters),
            }
        }

        let digits = normalized.chars().filter(char::is_ascii_digit).count();
        if !(Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&digits) {
            return Err(PhoneError::BadLength {
                min: Self::MIN_DIGITS,
                max: Self::MAX_DIGITS,
            });
        }

        Ok(Self(normalized))
    }

    /// Returns the normalized phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Phone` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Phone {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Phone {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Phone {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(Phone::parse("5558675309").is_ok());
        assert!(Phone::parse("+445558675309").is_ok());
        assert!(Phone::parse("555-867-5309").is_ok());
        assert!(Phone::parse("(555) 867 5309").is_ok());
    }

    #[test]
    fn test_parse_strips_separators() {
        let phone = Phone::parse("+1 (555) 867-5309").unwrap();
        assert_eq!(phone.as_str(), "+15558675309");
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(Phone::parse(""), Err(PhoneError::Empty)));
    }

    #[test]
    fn test_parse_too_short() {
        assert!(matches!(
            Phone::parse("123456"),
            Err(PhoneError::BadLength { .. })
        ));
    }

    #[test]
    fn test_parse_too_long() {
        assert!(matches!(
            Phone::parse("1234567890123456"),
            Err(PhoneError::BadLength { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_letters() {
        assert!(matches!(
            Phone::parse("555-CALL-NOW"),
            Err(PhoneError::InvalidCharacters)
        ));
    }

    #[test]
    fn test_plus_only_leading() {
        assert!(matches!(
            Phone::parse("555+8675309"),
            Err(PhoneError::InvalidCharacters)
        ));
    }

    #[test]
    fn test_serde_roundtrip() {
        let phone = Phone::parse("+15558675309").unwrap();
        let json = serde_json::to_string(&phone).unwrap();
        assert_eq!(json, "\"+15558675309\"");
        let parsed: Phone = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, phone);
    }
}
