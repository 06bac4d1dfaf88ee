//! API error taxonomy and HTTP mapping
//!
//! Every failure leaving a handler is an [`ApiError`]: a wire-level code,
//! a human message, and the HTTP status implied by the code. Core errors
//! convert by origin, so no handler inspects message text.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Wire-level error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Missing or malformed request field
    InvalidInput,
    /// Unsupported format tag
    InvalidFormat,
    /// Identical input and output format
    UnsupportedConversion,
    /// Malformed source-format data
    ParseError,
    /// Payload over the 5MB cap
    PayloadTooLarge,
    /// Cyclic structure detected during serialization. Kept for taxonomy
    /// compatibility; tree values are acyclic by construction, so this is
    /// never produced.
    CircularReference,
    /// Malformed query expression
    QueryError,
    /// Malformed schema document (a failed validation is a normal response)
    ValidationError,
    /// Unexpected failure
    InternalError,
    /// Unknown route
    NotFound,
}

impl ErrorCode {
    /// HTTP status implied by this code
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// A request-scoped failure, rendered as the error envelope
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidFormat, message)
    }

    pub fn unsupported_conversion(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UnsupportedConversion, message)
    }

    pub fn payload_too_large() -> Self {
        Self::new(ErrorCode::PayloadTooLarge, "Data exceeds 5MB limit")
    }

    pub fn not_found() -> Self {
        Self::new(ErrorCode::NotFound, "Endpoint not found")
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Required-field error with the original wire message
    pub fn missing_field(name: &str) -> Self {
        Self::invalid_input(format!("Missing required field: {}", name))
    }
}

#[derive(Serialize)]
struct ErrorEnvelope {
    success: bool,
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: ErrorCode,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status();
        if status.is_server_error() {
            tracing::error!(code = ?self.code, message = %self.message, "request failed");
        } else {
            tracing::debug!(code = ?self.code, message = %self.message, "request rejected");
        }

        let body = ErrorEnvelope {
            success: false,
            error: ErrorBody {
                code: self.code,
                message: self.message,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<reshape_core::Error> for ApiError {
    fn from(err: reshape_core::Error) -> Self {
        use reshape_core::Error as Core;
        let code = match &err {
            Core::Parse { .. } => ErrorCode::ParseError,
            Core::Query { .. } => ErrorCode::QueryError,
            Core::Schema { .. } => ErrorCode::ValidationError,
            Core::Serialize { .. } | Core::Json(_) => ErrorCode::InternalError,
        };
        Self::new(code, err.to_string())
    }
}
