//! POST /api/diff - structural comparison of two trees

use crate::error::ApiError;
use crate::response::{success, Envelope};
use crate::routes::utils::{parse_body, present};
use axum::body::Bytes;
use axum::Json;
use reshape_core::diff::{diff_trees, Change, DiffSummary};
use serde::Serialize;
use std::time::Instant;

#[derive(Debug, Serialize)]
pub struct DiffData {
    pub changes: Vec<Change>,
    pub summary: DiffSummary,
}

pub async fn handle(bytes: Bytes) -> Result<Json<Envelope<DiffData>>, ApiError> {
    let started = Instant::now();
    let body = parse_body(&bytes)?;

    // explicit null is a legal tree here, only absence is an error
    let original = present(&body, "original")?;
    let modified = present(&body, "modified")?;

    let report = diff_trees(original, modified);

    Ok(success(
        DiffData {
            changes: report.changes,
            summary: report.summary,
        },
        started,
    ))
}
