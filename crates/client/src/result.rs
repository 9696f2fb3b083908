//! The universal return shape of the remote access layer.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A tagged success/failure envelope.
///
/// Exactly one arm holds; callers must discriminate before touching the
/// payload. The serde representation matches the wire envelope:
/// `{"success": true, "data": ...}` or
/// `{"success": false, "error": "..."}`.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteResult<T> {
    /// The call succeeded with a payload.
    Success {
        data: T,
        message: Option<String>,
    },
    /// The call failed with a human-readable error string.
    Failure {
        error: String,
        message: Option<String>,
    },
}

impl<T> RemoteResult<T> {
    /// A success with no message.
    pub const fn success(data: T) -> Self {
        Self::Success {
            data,
            message: None,
        }
    }

    /// A failure with no message.
    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
            message: None,
        }
    }

    /// Whether this is the success arm.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The payload, when present.
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    /// The error string, when present.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error),
        }
    }

    /// Convert into a plain `Result`, discarding messages.
    ///
    /// # Errors
    ///
    /// Returns the failure's error string.
    pub fn into_result(self) -> Result<T, String> {
        match self {
            Self::Success { data, .. } => Ok(data),
            Self::Failure { error, .. } => Err(error),
        }
    }

    /// Map the success payload.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RemoteResult<U> {
        match self {
            Self::Success { data, message } => RemoteResult::Success {
                data: f(data),
                message,
            },
            Self::Failure { error, message } => RemoteResult::Failure { error, message },
        }
    }
}

#[derive(Serialize, Deserialize)]
struct Repr {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl<T: Serialize> Serialize for RemoteResult<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let repr = match self {
            Self::Success { data, message } => Repr {
                success: true,
                data: Some(
                    serde_json::to_value(data).map_err(serde::ser::Error::custom)?,
                ),
                error: None,
                message: message.clone(),
            },
            Self::Failure { error, message } => Repr {
                success: false,
                data: None,
                error: Some(error.clone()),
                message: message.clone(),
            },
        };
        repr.serialize(serializer)
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for RemoteResult<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = Repr::deserialize(deserializer)?;

        if repr.success {
            // Message-only success bodies (logout, wishlist ops) carry no
            // data key; those deserialize as unit/option payloads from null.
            let value = repr.data.unwrap_or(serde_json::Value::Null);
            let data = T::deserialize(value).map_err(serde::de::Error::custom)?;
            Ok(Self::Success {
                data,
                message: repr.message,
            })
        } else {
            let error = repr
                .error
                .ok_or_else(|| serde::de::Error::missing_field("error"))?;
            Ok(Self::Failure {
                error,
                message: repr.message,
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_success_roundtrip() {
        let result: RemoteResult<i32> = RemoteResult::success(7);
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"success":true,"data":7}"#);

        let parsed: RemoteResult<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn test_failure_roundtrip() {
        let result: RemoteResult<i32> = RemoteResult::failure("Invalid credentials");
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"success":false,"error":"Invalid credentials"}"#);

        let parsed: RemoteResult<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn test_message_only_success_parses_as_unit() {
        let parsed: RemoteResult<()> =
            serde_json::from_str(r#"{"success":true,"message":"Logged out successfully"}"#)
                .unwrap();
        assert!(parsed.is_success());
        assert!(matches!(parsed, RemoteResult::Success { message: Some(m), .. }
            if m == "Logged out successfully"));
    }

    #[test]
    fn test_failure_without_error_is_rejected() {
        let parsed: Result<RemoteResult<i32>, _> = serde_json::from_str(r#"{"success":false}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_discrimination() {
        let ok: RemoteResult<i32> = RemoteResult::success(1);
        let err: RemoteResult<i32> = RemoteResult::failure("boom");

        assert!(ok.is_success());
        assert_eq!(ok.data(), Some(&1));
        assert_eq!(ok.error(), None);

        assert!(!err.is_success());
        assert_eq!(err.data(), None);
        assert_eq!(err.error(), Some("boom"));
    }

    #[test]
    fn test_into_result_and_map() {
        let ok: RemoteResult<i32> = RemoteResult::success(2);
        assert_eq!(ok.map(|n| n * 2).into_result(), Ok(4));

        let err: RemoteResult<i32> = RemoteResult::failure("no");
        assert_eq!(err.map(|n| n * 2).into_result(), Err("no".to_string()));
    }
}
