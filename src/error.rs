//! Error taxonomy and structured error responses.
//!
//! # Design Decisions
//! - User-visible failures are always `{error, message}` JSON bodies
//! - Validation failures additionally carry a machine-readable `fields` list
//! - Internal fault detail (sources, stack) never crosses the HTTP boundary

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// A single violated field in a request validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors surfaced while building the gateway. These are startup-time
/// failures; the process must not begin serving with any of them present.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Two routes collide on the same method and path-template shape.
    #[error("route {method} {template} is declared more than once")]
    RouteConflict { method: String, template: String },

    /// A proxy rule's target is not a usable URL.
    #[error("invalid proxy target `{0}`")]
    InvalidTarget(String),
}

/// Structured body for user-visible failures.
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<FieldViolation>,
}

fn error_response(
    status: StatusCode,
    error: &str,
    message: String,
    fields: Vec<FieldViolation>,
) -> Response {
    (
        status,
        Json(ErrorBody {
            error,
            message,
            fields,
        }),
    )
        .into_response()
}

/// 400 response listing every violated field.
pub fn validation_failure(fields: Vec<FieldViolation>) -> Response {
    error_response(
        StatusCode::BAD_REQUEST,
        "Bad Request",
        "request parameters failed validation".to_string(),
        fields,
    )
}

/// 404 response for a path neither the route table nor any proxy rule handles.
pub fn not_found(path: &str) -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        "Not Found",
        format!("no route or proxy rule matches {path}"),
        Vec::new(),
    )
}

/// 502 response once every forwarding attempt has failed.
pub fn bad_gateway(message: &str) -> Response {
    error_response(
        StatusCode::BAD_GATEWAY,
        "Bad Gateway",
        message.to_string(),
        Vec::new(),
    )
}

/// Default response when a pre-forward hook vetoes without supplying one.
pub fn forbidden() -> Response {
    error_response(
        StatusCode::FORBIDDEN,
        "Forbidden",
        "request rejected before forwarding".to_string(),
        Vec::new(),
    )
}

/// 413 response when the buffered request body exceeds the configured cap.
pub fn payload_too_large() -> Response {
    error_response(
        StatusCode::PAYLOAD_TOO_LARGE,
        "Payload Too Large",
        "request body exceeds the configured limit".to_string(),
        Vec::new(),
    )
}
