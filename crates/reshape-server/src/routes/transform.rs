//! POST /api/transform - convert data between formats

use crate::error::ApiError;
use crate::response::{success, Envelope};
use crate::routes::utils::{parse_body, required, MAX_PAYLOAD_BYTES};
use axum::body::Bytes;
use axum::Json;
use reshape_core::transform::{parse_input, serialize, Format, TransformOptions};
use reshape_core::tree::byte_size;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformData {
    pub result: String,
    pub input_format: Format,
    pub output_format: Format,
    pub input_size: usize,
    pub output_size: usize,
}

pub async fn handle(bytes: Bytes) -> Result<Json<Envelope<TransformData>>, ApiError> {
    let started = Instant::now();
    let body = parse_body(&bytes)?;

    // presence of all required fields is checked before tag validity
    let input_raw = format_field(&body, "input")?;
    let output_raw = format_field(&body, "output")?;
    let data = required(&body, "data")?;

    let input = parse_format(input_raw, "input")?;
    let output = parse_format(output_raw, "output")?;
    let options = options_field(&body)?;

    if input == output {
        return Err(ApiError::unsupported_conversion(format!(
            "Input and output formats are the same: {}",
            input
        )));
    }

    let input_text = match data {
        Value::String(s) => s.clone(),
        other => serde_json::to_string(other)
            .map_err(|e| ApiError::internal(e.to_string()))?,
    };
    let input_size = byte_size(&input_text);
    if input_size > MAX_PAYLOAD_BYTES {
        return Err(ApiError::payload_too_large());
    }

    let parsed = parse_input(data, input)?;
    let result = serialize(&parsed, output, &options)?;
    let output_size = byte_size(&result);

    Ok(success(
        TransformData {
            result,
            input_format: input,
            output_format: output,
            input_size,
            output_size,
        },
        started,
    ))
}

/// Presence check for a format tag field: missing/null/empty is
/// `INVALID_INPUT`.
fn format_field<'a>(body: &'a Value, name: &str) -> Result<&'a Value, ApiError> {
    match body.get(name) {
        None | Some(Value::Null) => Err(ApiError::missing_field(name)),
        Some(Value::String(s)) if s.is_empty() => Err(ApiError::missing_field(name)),
        Some(value) => Ok(value),
    }
}

/// Tag validity check: anything but a supported tag is `INVALID_FORMAT`.
fn parse_format(raw: &Value, name: &str) -> Result<Format, ApiError> {
    raw.as_str().and_then(|s| s.parse::<Format>().ok()).ok_or_else(|| {
        let shown = match raw.as_str() {
            Some(s) => s.to_string(),
            None => raw.to_string(),
        };
        ApiError::invalid_format(format!(
            "Invalid {} format: {}. Supported: json, csv, xml, yaml, toml",
            name, shown,
        ))
    })
}

fn options_field(body: &Value) -> Result<TransformOptions, ApiError> {
    match body.get("options") {
        None | Some(Value::Null) => Ok(TransformOptions::default()),
        Some(raw) => serde_json::from_value(raw.clone())
            .map_err(|e| ApiError::invalid_input(format!("Invalid options: {}", e))),
    }
}
