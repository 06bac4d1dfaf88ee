//! Reshape Server - HTTP facade over the reshape-core components
//!
//! Exposes the six data-manipulation operations as POST endpoints under
//! `/api`, plus service info and health endpoints. All routing, request
//! validation, and response shaping lives here; the actual transformations
//! live in `reshape-core`.

pub mod config;
pub mod error;
pub mod logging;
pub mod response;
pub mod routes;
pub mod state;

use state::AppState;
use std::sync::Arc;

/// Build the application router with fresh state.
pub fn app() -> axum::Router {
    routes::app(Arc::new(AppState::new()))
}
