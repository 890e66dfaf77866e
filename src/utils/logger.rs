use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;

/// Parse the configured level into a filter.
pub fn level_filter(level: &str) -> Result<LevelFilter, String> {
    match level.trim().to_lowercase().as_str() {
        "trace" => Ok(LevelFilter::TRACE),
        "debug" => Ok(LevelFilter::DEBUG),
        "info" => Ok(LevelFilter::INFO),
        "warn" => Ok(LevelFilter::WARN),
        "error" => Ok(LevelFilter::ERROR),
        _ => Err(format!(
            "Invalid logging.level '{}'. Valid values: trace, debug, info, warn, error",
            level
        )),
    }
}

/// Install the global subscriber. `RUST_LOG` directives are layered on top
/// of the configured level.
pub fn init_logging(logging_config: &LoggingConfig) -> Result<(), String> {
    let level = level_filter(&logging_config.level)?;
    let filter_layer = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let registry = tracing_subscriber::registry().with(filter_layer);
    let installed = match logging_config.format.trim().to_lowercase().as_str() {
        "json" => registry
            .with(fmt::layer().json().flatten_event(true))
            .try_init(),
        "console" => registry.with(fmt::layer().pretty()).try_init(),
        other => {
            return Err(format!(
                "Invalid logging.format '{}'. Valid values: json, console",
                other
            ))
        }
    };
    installed.map_err(|e| format!("Failed to install logger: {}", e))
}
