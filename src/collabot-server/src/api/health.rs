//! Liveness endpoint.

use std::sync::Arc;

use axum::extract::State;
use tracing::debug;

use crate::state::AppState;

/// Fixed body returned by `/health`.
pub const HEALTH_TEXT: &str = "Collabor·AI·te is running!";

/// Health check endpoint.
pub async fn health_check(State(state): State<Arc<AppState>>) -> &'static str {
    debug!(uptime_secs = state.uptime().as_secs(), "Health check");
    HEALTH_TEXT
}
