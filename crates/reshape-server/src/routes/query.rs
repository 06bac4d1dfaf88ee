//! POST /api/query - evaluate a JMESPath expression

use crate::error::ApiError;
use crate::response::{success, Envelope};
use crate::routes::utils::{parse_body, required};
use axum::body::Bytes;
use axum::Json;
use reshape_core::query::run_query;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryData {
    pub result: Value,
    pub query: String,
    pub match_count: usize,
}

pub async fn handle(bytes: Bytes) -> Result<Json<Envelope<QueryData>>, ApiError> {
    let started = Instant::now();
    let body = parse_body(&bytes)?;

    let data = required(&body, "data")?;
    let query = match body.get("query") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => {
            return Err(ApiError::invalid_input(
                "query must be a non-empty string",
            ))
        }
    };

    let outcome = run_query(data, &query)?;

    Ok(success(
        QueryData {
            result: outcome.result,
            query,
            match_count: outcome.match_count,
        },
        started,
    ))
}
