//! Application startup and server initialization.
//!
//! Builds the shared state from the loaded settings and serves the routes.

use tokio::net::TcpListener;
use tracing::info;

use crate::config::Settings;
use crate::routes;
use crate::state::AppState;

/// Initializes and runs the config service.
///
/// # Errors
///
/// Returns an error if the server fails to bind to the configured address
/// or encounters a runtime error during execution.
pub async fn run(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        app_env = %settings.environment.app_env(),
        api_server_url = %settings.environment.api_server_url(),
        auth0_tenant = %settings.environment.auth0().tenant_host(),
        "Serving environment"
    );

    let state = AppState::new(settings.environment);
    let app = routes::create_router(state);

    info!("Starting server on {}", settings.server.bind_address);

    let listener = TcpListener::bind(&settings.server.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
