//! Router assembly
//!
//! One thin route module per operation, plus the info endpoints. The
//! fallback produces the 404 envelope and the catch-panic layer turns any
//! handler panic into a generic 500 envelope so internals never leak.

pub mod diff;
pub mod flatten;
pub mod meta;
pub mod query;
pub mod transform;
pub mod utils;
pub mod validate;

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the full application router.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/", get(meta::service_info))
        .route("/health", get(meta::health))
        .route("/mcp-tool.json", get(meta::mcp_tool))
        .route("/api/transform", post(transform::handle))
        .route("/api/flatten", post(flatten::handle_flatten))
        .route("/api/unflatten", post(flatten::handle_unflatten))
        .route("/api/query", post(query::handle))
        .route("/api/diff", post(diff::handle))
        .route("/api/validate", post(validate::handle))
        .fallback(not_found)
        .layer(DefaultBodyLimit::disable())
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::not_found()
}

fn panic_response(_err: Box<dyn Any + Send + 'static>) -> Response {
    use axum::response::IntoResponse;
    tracing::error!("handler panicked");
    ApiError::internal("An unexpected error occurred").into_response()
}
