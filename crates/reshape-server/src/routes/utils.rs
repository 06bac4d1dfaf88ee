//! Shared request-decoding helpers for the operation handlers
//!
//! Handlers work from the raw body so that required-field checks and the
//! payload cap run before any component is invoked, and so a non-JSON body
//! maps to the envelope's `INVALID_INPUT` instead of a framework rejection.

use crate::error::ApiError;
use axum::body::Bytes;
use serde_json::{Map, Value};

/// Request payloads over this many bytes are rejected before parsing
pub const MAX_PAYLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Decode the request body as JSON, enforcing the payload cap first.
pub fn parse_body(bytes: &Bytes) -> Result<Value, ApiError> {
    if bytes.len() > MAX_PAYLOAD_BYTES {
        return Err(ApiError::payload_too_large());
    }
    serde_json::from_slice(bytes)
        .map_err(|_| ApiError::invalid_input("Request body must be valid JSON"))
}

/// A field that must be present and non-null.
pub fn required<'a>(body: &'a Value, name: &str) -> Result<&'a Value, ApiError> {
    match body.get(name) {
        Some(Value::Null) | None => Err(ApiError::missing_field(name)),
        Some(value) => Ok(value),
    }
}

/// A field that must be present; explicit null is allowed.
pub fn present<'a>(body: &'a Value, name: &str) -> Result<&'a Value, ApiError> {
    body.get(name).ok_or_else(|| ApiError::missing_field(name))
}

/// A field that must be a plain (non-array) JSON object.
pub fn required_object<'a>(
    body: &'a Value,
    name: &str,
    message: &str,
) -> Result<&'a Map<String, Value>, ApiError> {
    body.get(name)
        .and_then(Value::as_object)
        .ok_or_else(|| ApiError::invalid_input(message))
}

/// Optional delimiter field, defaulting to `.`; when given it must be a
/// non-empty string.
pub fn delimiter_field(body: &Value) -> Result<String, ApiError> {
    match body.get("delimiter") {
        None => Ok(".".to_string()),
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(_) => Err(ApiError::invalid_input(
            "delimiter must be a non-empty string",
        )),
    }
}
