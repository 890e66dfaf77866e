use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use url::Url;

use super::error::{CallbackPathError, ConfigurationError};
use crate::utils::value::value_to_string;

const AUTH0_HOST_SUFFIX: &str = ".auth0.com";

/// Which build profile the front-end runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn is_production(self) -> bool {
        matches!(self, AppEnv::Production)
    }
}

impl FromStr for AppEnv {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Ok(AppEnv::Production),
            "development" | "dev" => Ok(AppEnv::Development),
            _ => Err(ConfigurationError::InvalidAppEnv {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for AppEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppEnv::Development => write!(f, "development"),
            AppEnv::Production => write!(f, "production"),
        }
    }
}

/// The environment block as it appears in the sources, before validation.
///
/// Every field is optional here; `EnvironmentConfig::validate` decides what
/// is acceptable.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawEnvironment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production: Option<bool>,
    /// `production` or `development`. Takes precedence over `production`.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<String>")]
    pub app_env: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<String>")]
    pub api_server_url: Option<String>,
    #[serde(default)]
    pub auth0: RawAuth0,
}

/// Identity-provider block before validation.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawAuth0 {
    /// Tenant domain prefix, e.g. `my-tenant.us`.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<String>")]
    pub url: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<String>")]
    pub audience: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<String>")]
    pub client_id: Option<String>,
    #[serde(
        rename = "callbackURL",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<String>")]
    pub callback_url: Option<String>,
}

impl RawEnvironment {
    /// The development profile the front-end ships with.
    pub fn development() -> Self {
        RawEnvironment {
            production: Some(false),
            app_env: None,
            api_server_url: Some("http://127.0.0.1:5000".to_string()),
            auth0: RawAuth0 {
                url: Some("fullstack-nano-degree.us".to_string()),
                audience: Some("Coffeeshp".to_string()),
                client_id: Some("A1p6vlo5BMp9pPqPTP5ZWwBMWG31r0sw".to_string()),
                callback_url: Some("http://localhost:8100/tabs/user-page".to_string()),
            },
        }
    }

    /// Resolve the production flag. `appEnv` wins over `production`.
    pub fn app_env(&self) -> Result<AppEnv, ConfigurationError> {
        if let Some(value) = self.app_env.as_deref() {
            return value.parse();
        }
        match self.production {
            Some(true) => Ok(AppEnv::Production),
            Some(false) => Ok(AppEnv::Development),
            None => Err(ConfigurationError::Missing {
                field: "production",
            }),
        }
    }
}

/// Numbers and booleans coming from environment variables are parsed by
/// figment; turn them back into the string the operator typed.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(value) => Some(value_to_string(value)),
    })
}

/// A URL field as the operator wrote it, together with its parsed form.
///
/// Equality and serialization use the written string, so a loaded record
/// compares equal to its input even though `Url` normalises
/// (`http://127.0.0.1:5000` parses to `http://127.0.0.1:5000/`).
#[derive(Debug, Clone)]
pub struct ConfiguredUrl {
    raw: String,
    parsed: Url,
}

impl ConfiguredUrl {
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn as_url(&self) -> &Url {
        &self.parsed
    }
}

impl PartialEq for ConfiguredUrl {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for ConfiguredUrl {}

impl PartialEq<str> for ConfiguredUrl {
    fn eq(&self, other: &str) -> bool {
        self.raw == other
    }
}

impl fmt::Display for ConfiguredUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for ConfiguredUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

/// Validated environment settings of the front-end.
///
/// Only `EnvironmentConfig::validate` can build one, and it exposes no
/// setters, so a value in hand is always complete and never changes.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentConfig {
    production: bool,
    api_server_url: ConfiguredUrl,
    auth0: Auth0Config,
}

/// Validated identity-provider settings.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Auth0Config {
    url: String,
    audience: String,
    client_id: String,
    #[serde(rename = "callbackURL")]
    callback_url: ConfiguredUrl,
}

impl EnvironmentConfig {
    /// Check every field of `raw`, in declaration order, and stop at the
    /// first one that is missing, empty or malformed.
    pub fn validate(raw: RawEnvironment) -> Result<Self, ConfigurationError> {
        let production = raw.app_env()?.is_production();
        let api_server_url = required_url("apiServerUrl", raw.api_server_url)?;
        let auth0 = Auth0Config {
            url: required("auth0.url", raw.auth0.url)?,
            audience: required("auth0.audience", raw.auth0.audience)?,
            client_id: required("auth0.clientId", raw.auth0.client_id)?,
            callback_url: required_url("auth0.callbackURL", raw.auth0.callback_url)?,
        };

        Ok(EnvironmentConfig {
            production,
            api_server_url,
            auth0,
        })
    }

    pub fn production(&self) -> bool {
        self.production
    }

    pub fn app_env(&self) -> AppEnv {
        if self.production {
            AppEnv::Production
        } else {
            AppEnv::Development
        }
    }

    /// Base URL of the backend API.
    pub fn api_server_url(&self) -> &ConfiguredUrl {
        &self.api_server_url
    }

    pub fn auth0(&self) -> &Auth0Config {
        &self.auth0
    }
}

impl Auth0Config {
    /// Tenant domain prefix as configured.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn callback_url(&self) -> &ConfiguredUrl {
        &self.callback_url
    }

    /// Fully qualified tenant host, e.g. `my-tenant.us.auth0.com`.
    pub fn tenant_host(&self) -> String {
        let host = self
            .url
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/');
        if host.ends_with(AUTH0_HOST_SUFFIX) {
            host.to_string()
        } else {
            format!("{}{}", host, AUTH0_HOST_SUFFIX)
        }
    }

    pub fn issuer(&self) -> String {
        format!("https://{}/", self.tenant_host())
    }

    /// Where the tenant publishes its signing keys.
    pub fn jwks_uri(&self) -> String {
        format!("https://{}/.well-known/jwks.json", self.tenant_host())
    }

    /// Hosted login page address. After login the browser is sent to
    /// `callbackURL` followed by `callback_path`.
    ///
    /// `callback_path` may only extend the callback with a path, query or
    /// fragment; the redirect always stays on the callback's origin.
    pub fn login_url(&self, callback_path: &str) -> Result<String, CallbackPathError> {
        let redirect_uri = self.redirect_uri(callback_path)?;
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("audience", &self.audience)
            .append_pair("response_type", "token")
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", redirect_uri.as_str())
            .finish();
        Ok(format!("https://{}/authorize?{}", self.tenant_host(), query))
    }

    fn redirect_uri(&self, callback_path: &str) -> Result<Url, CallbackPathError> {
        if callback_path.is_empty() {
            return Ok(self.callback_url.as_url().clone());
        }
        if !callback_path.starts_with(['/', '?', '#']) {
            return Err(CallbackPathError::NotAPath {
                value: callback_path.to_string(),
            });
        }

        let joined = format!("{}{}", self.callback_url.as_str(), callback_path);
        let redirect = Url::parse(&joined).map_err(|source| CallbackPathError::Malformed {
            value: callback_path.to_string(),
            source,
        })?;
        if redirect.origin() != self.callback_url.as_url().origin() {
            return Err(CallbackPathError::ForeignOrigin {
                value: callback_path.to_string(),
            });
        }
        Ok(redirect)
    }
}

fn required(field: &'static str, value: Option<String>) -> Result<String, ConfigurationError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ConfigurationError::Missing { field }),
    }
}

fn required_url(
    field: &'static str,
    value: Option<String>,
) -> Result<ConfiguredUrl, ConfigurationError> {
    let value = required(field, value)?;
    let parsed = match Url::parse(&value) {
        Ok(parsed) => parsed,
        Err(source) => {
            return Err(ConfigurationError::InvalidUrl {
                field,
                value,
                source,
            })
        }
    };
    if !parsed.has_host() {
        return Err(ConfigurationError::UrlWithoutHost { field, value });
    }
    Ok(ConfiguredUrl { raw: value, parsed })
}
