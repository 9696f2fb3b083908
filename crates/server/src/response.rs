//! Success-envelope helpers.
//!
//! Every successful response is `{success: true, data?, message?}`; these
//! helpers keep handlers from assembling that by hand.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// The success envelope.
#[derive(Debug, Serialize)]
pub struct Success<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// 200 with a data payload.
pub fn ok<T: Serialize>(data: T) -> Response {
    envelope(StatusCode::OK, Some(data), None)
}

/// 200 with a data payload and a message.
pub fn ok_with_message<T: Serialize>(data: T, message: &str) -> Response {
    envelope(StatusCode::OK, Some(data), Some(message.to_owned()))
}

/// 200 with only a message.
pub fn message(message: &str) -> Response {
    envelope::<()>(StatusCode::OK, None, Some(message.to_owned()))
}

/// 201 with a data payload.
pub fn created<T: Serialize>(data: T) -> Response {
    envelope(StatusCode::CREATED, Some(data), None)
}

/// 201 with a data payload and a message.
pub fn created_with_message<T: Serialize>(data: T, message: &str) -> Response {
    envelope(StatusCode::CREATED, Some(data), Some(message.to_owned()))
}

fn envelope<T: Serialize>(status: StatusCode, data: Option<T>, message: Option<String>) -> Response {
    (
        status,
        Json(Success {
            success: true,
            data,
            message,
        }),
    )
        .into_response()
}
