//! HTTP route definitions and handlers.
//!
//! Routes are grouped into the environment endpoints consumed by the
//! front-end and the health check. Unknown paths get the JSON error envelope.

mod environment_routes;
mod health_routes;

use crate::state::AppState;
use crate::utils::http_helpers::HTTPError;
use axum::Router;

/// Creates the application router with all configured routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(environment_routes::routes())
        .merge(health_routes::routes())
        .fallback(not_found)
        .with_state(state)
}

async fn not_found() -> HTTPError {
    HTTPError::not_found()
}
