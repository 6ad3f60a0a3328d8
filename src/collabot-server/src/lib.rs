//! Collabot webhook server.
//!
//! This crate provides:
//! - `POST /askai` - forward a question to the LLM and reply in Slack
//! - `POST /project` - add, update and list team projects
//! - `POST /welcome` - onboard new workspace members (Events API)
//! - `GET /health` - liveness check
//!
//! The POST routes only accept requests carrying a valid Slack signature
//! unless verification is switched off in the configuration.

#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod middleware;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub use config::ServerConfig;
pub use error::{AppError, AppResult};
pub use state::AppState;

/// Run the server with the given configuration.
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    run_with_shutdown(config, std::future::pending()).await
}

/// Run the server with graceful shutdown support.
pub async fn run_with_shutdown<F>(config: ServerConfig, shutdown: F) -> anyhow::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    config.validate()?;

    if !config.slack.verify_signatures() {
        warn!("Slack signature verification is disabled!");
        warn!("Anyone who can reach this server can trigger commands.");
    }

    let addr: SocketAddr = config.listen_addr.parse()?;
    let state = Arc::new(AppState::new(config)?);
    let app = create_router_with_state(state);

    info!("Starting Collabot server on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server shut down");
    Ok(())
}

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    create_router_with_state(Arc::new(state))
}

/// Create the application router with an Arc-wrapped state.
pub fn create_router_with_state(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_body_size;

    Router::new()
        .merge(api::routes(Arc::clone(&state)))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum::middleware::from_fn(middleware::timing_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
