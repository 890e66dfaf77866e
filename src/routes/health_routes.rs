//! Liveness endpoint.

use crate::state::AppState;
use axum::{routing::get, Router};

/// Registers the liveness route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

// Loading fails before the listener binds, so reaching this handler already
// means the environment is valid.
async fn health_check() -> &'static str {
    "OK"
}
