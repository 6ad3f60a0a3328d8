//! Webhook routes and handlers.
//!
//! The three Slack-facing POST routes sit behind signature verification;
//! `/health` does not.

mod askai;
mod health;
mod project;
mod welcome;

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::middleware::verify_slack_signature;
use crate::state::AppState;

pub use health::HEALTH_TEXT;

/// Create the webhook routes.
pub fn routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let slack_routes = Router::new()
        .route("/askai", post(askai::ask))
        .route("/project", post(project::project))
        .route("/welcome", post(welcome::welcome))
        .route_layer(middleware::from_fn_with_state(state, verify_slack_signature));

    Router::new()
        .merge(slack_routes)
        .route("/health", get(health::health_check))
}
