//! Uniform success envelope
//!
//! Every operation returns `{success: true, data, meta}` where meta carries
//! the fixed credit cost and elapsed wall-clock milliseconds. Failures use
//! the error envelope in [`crate::error`].

use axum::Json;
use serde::Serialize;
use std::time::Instant;

/// Fixed credit cost per successful request
pub const CREDITS_PER_REQUEST: u32 = 1;

/// Success envelope wrapping an operation result
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    pub meta: Meta,
}

/// Request metadata attached to every success
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub credits: u32,
    pub processing_ms: u64,
}

/// Wrap an operation result, stamping elapsed time since `started`.
pub fn success<T: Serialize>(data: T, started: Instant) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        data,
        meta: Meta {
            credits: CREDITS_PER_REQUEST,
            processing_ms: started.elapsed().as_millis() as u64,
        },
    })
}
