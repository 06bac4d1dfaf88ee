//! POST /api/flatten and POST /api/unflatten

use crate::error::ApiError;
use crate::response::{success, Envelope};
use crate::routes::utils::{delimiter_field, parse_body, required_object};
use axum::body::Bytes;
use axum::Json;
use reshape_core::flatten::{flatten, unflatten, FlattenOptions};
use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Instant;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlattenData {
    pub result: Map<String, Value>,
    pub keys_flattened: usize,
    pub original_depth: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnflattenData {
    pub result: Value,
    pub keys_expanded: usize,
}

pub async fn handle_flatten(bytes: Bytes) -> Result<Json<Envelope<FlattenData>>, ApiError> {
    let started = Instant::now();
    let body = parse_body(&bytes)?;

    let data = required_object(&body, "data", "data must be a plain object")?;
    let delimiter = delimiter_field(&body)?;
    let max_depth = max_depth_field(&body)?;

    let outcome = flatten(
        &Value::Object(data.clone()),
        &FlattenOptions {
            delimiter,
            max_depth,
        },
    );

    Ok(success(
        FlattenData {
            result: outcome.result,
            keys_flattened: outcome.keys_flattened,
            original_depth: outcome.original_depth,
        },
        started,
    ))
}

pub async fn handle_unflatten(bytes: Bytes) -> Result<Json<Envelope<UnflattenData>>, ApiError> {
    let started = Instant::now();
    let body = parse_body(&bytes)?;

    let data = required_object(&body, "data", "data must be a plain object")?;
    let delimiter = delimiter_field(&body)?;

    let outcome = unflatten(data, &delimiter);

    Ok(success(
        UnflattenData {
            result: outcome.result,
            keys_expanded: outcome.keys_expanded,
        },
        started,
    ))
}

fn max_depth_field(body: &Value) -> Result<usize, ApiError> {
    match body.get("maxDepth") {
        None => Ok(10),
        Some(raw) => raw
            .as_u64()
            .filter(|d| (1..=100).contains(d))
            .map(|d| d as usize)
            .ok_or_else(|| {
                ApiError::invalid_input("maxDepth must be a number between 1 and 100")
            }),
    }
}
