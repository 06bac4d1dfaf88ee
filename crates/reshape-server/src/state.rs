//! Shared application state
//!
//! The service is stateless per request; the only shared value is the
//! process start time backing the health endpoint's uptime field.

use std::time::Instant;

#[derive(Debug, Clone)]
pub struct AppState {
    /// Process start, for uptime reporting
    pub started: Instant,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
