//! POST /api/validate - check a tree against a JSON Schema

use crate::error::ApiError;
use crate::response::{success, Envelope};
use crate::routes::utils::{parse_body, present, required_object};
use axum::body::Bytes;
use axum::Json;
use reshape_core::validate::{validate_schema, ValidationIssue};
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;

#[derive(Debug, Serialize)]
pub struct ValidateData {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
}

pub async fn handle(bytes: Bytes) -> Result<Json<Envelope<ValidateData>>, ApiError> {
    let started = Instant::now();
    let body = parse_body(&bytes)?;

    let data = present(&body, "data")?;
    let schema = required_object(&body, "schema", "schema must be a valid JSON Schema object")?;

    let report = validate_schema(data, &Value::Object(schema.clone()))?;

    Ok(success(
        ValidateData {
            valid: report.valid,
            errors: report.errors,
        },
        started,
    ))
}
