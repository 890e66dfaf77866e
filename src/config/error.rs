use thiserror::Error;

/// Everything that can go wrong while producing an `EnvironmentConfig`.
///
/// Field names are reported with the keys the front-end uses
/// (`apiServerUrl`, `auth0.callbackURL`, ...), so an operator can match
/// them against the settings file directly.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("required field `{field}` is missing or empty")]
    Missing { field: &'static str },

    #[error("field `{field}` is not a valid absolute URL ({value:?}): {source}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("field `{field}` must be a URL with a host, got {value:?}")]
    UrlWithoutHost { field: &'static str, value: String },

    #[error("APP_ENV must be `production` or `development`, got {value:?}")]
    InvalidAppEnv { value: String },

    #[error("could not read configuration sources: {0}")]
    Source(#[from] figment::Error),
}

impl ConfigurationError {
    /// The offending field, when the error is tied to one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ConfigurationError::Missing { field }
            | ConfigurationError::InvalidUrl { field, .. }
            | ConfigurationError::UrlWithoutHost { field, .. } => Some(*field),
            ConfigurationError::InvalidAppEnv { .. } => Some("production"),
            ConfigurationError::Source(_) => None,
        }
    }
}

/// A `callback_path` that would not keep the login redirect on the
/// configured callback address.
#[derive(Debug, Error)]
pub enum CallbackPathError {
    #[error("callback_path must start with '/', '?' or '#', got {value:?}")]
    NotAPath { value: String },

    #[error("callback_path {value:?} does not form a valid URL: {source}")]
    Malformed {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("callback_path {value:?} leaves the callback origin")]
    ForeignOrigin { value: String },
}
