//! Shared application state.
//!
//! Holds the validated environment that every request handler reads.

use crate::config::EnvironmentConfig;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// The environment is built once at startup and only ever read afterwards,
/// so handlers share it through an `Arc` without locking.
#[derive(Clone)]
pub struct AppState {
    /// Front-end environment loaded at startup.
    pub environment: Arc<EnvironmentConfig>,
}

impl AppState {
    pub fn new(environment: EnvironmentConfig) -> Self {
        AppState {
            environment: Arc::new(environment),
        }
    }
}
