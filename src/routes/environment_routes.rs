//! Endpoints that hand the front-end its environment at runtime.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Redirect,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::EnvironmentConfig;
use crate::state::AppState;
use crate::utils::http_helpers::HTTPError;

/// Registers the environment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/environment", get(get_environment))
        .route("/login", get(login))
}

/// The validated environment, in the same shape the front-end compiles in.
async fn get_environment(State(state): State<AppState>) -> Json<EnvironmentConfig> {
    Json(state.environment.as_ref().clone())
}

#[derive(Deserialize)]
struct LoginParams {
    #[serde(default)]
    callback_path: String,
}

/// Sends the browser to the identity provider's hosted login page.
async fn login(
    State(state): State<AppState>,
    params: Result<Query<LoginParams>, QueryRejection>,
) -> Result<Redirect, HTTPError> {
    let Query(params) = params.map_err(|e| HTTPError::bad_request(e.body_text()))?;

    let target = state
        .environment
        .auth0()
        .login_url(&params.callback_path)
        .map_err(|e| {
            warn!(callback_path = %params.callback_path, "Rejected login callback path");
            HTTPError::bad_request(e.to_string())
        })?;

    debug!(callback_path = %params.callback_path, "Redirecting to identity provider");
    Ok(Redirect::temporary(&target))
}
