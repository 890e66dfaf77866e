use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::value::{Uncased, UncasedStr};
use figment::Figment;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::environment::{EnvironmentConfig, RawEnvironment};
use super::error::ConfigurationError;
use super::logging::LoggingConfig;
use super::server::ServerConfig;

/// Settings file read when `BREWENV_CONFIG` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "./environment.yaml";

/// Environment variable naming an alternative settings file.
pub const CONFIG_PATH_VAR: &str = "BREWENV_CONFIG";

/// Environment variables and the settings key each one feeds.
const ENV_KEYS: [(&str, &str); 9] = [
    ("APP_ENV", "appEnv"),
    ("API_SERVER_URL", "apiServerUrl"),
    ("AUTH0_DOMAIN", "auth0.url"),
    ("AUTH0_AUDIENCE", "auth0.audience"),
    ("AUTH0_CLIENT_ID", "auth0.clientId"),
    ("AUTH0_CALLBACK_URL", "auth0.callbackURL"),
    ("BIND_ADDRESS", "server.bind_address"),
    ("LOG_LEVEL", "logging.level"),
    ("LOG_FORMAT", "logging.format"),
];

/// Shape of the settings file: the front-end environment at the top level,
/// plus the blocks that configure this service.
#[derive(Deserialize, Serialize, Debug, Default, JsonSchema)]
pub struct SettingsFile {
    #[serde(flatten)]
    pub environment: RawEnvironment,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Everything the binary needs, validated.
#[derive(Debug, Clone)]
pub struct Settings {
    pub environment: EnvironmentConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// Layers configuration sources and validates the result.
///
/// Sources merged later win. When the merged sources declare a development
/// build, the development profile fills in whatever they leave out; a
/// production build gets no defaults.
#[derive(Clone)]
pub struct Loader {
    figment: Figment,
    development_defaults: bool,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

impl Loader {
    pub fn new() -> Self {
        Self::from_figment(Figment::new())
    }

    pub fn from_figment(figment: Figment) -> Self {
        Loader {
            figment,
            development_defaults: true,
        }
    }

    /// Merge a YAML settings file. A missing file contributes nothing.
    pub fn file(self, path: impl AsRef<Path>) -> Self {
        Loader {
            figment: self.figment.merge(Yaml::file(path.as_ref())),
            ..self
        }
    }

    /// Merge the documented environment variables.
    pub fn env(self) -> Self {
        let names: Vec<&str> = ENV_KEYS.iter().map(|(var, _)| *var).collect();
        let provider = Env::raw()
            .only(&names)
            .map(settings_key_for)
            .lowercase(false);
        Loader {
            figment: self.figment.merge(provider),
            ..self
        }
    }

    /// Require every field from the sources, whatever the build profile.
    pub fn without_defaults(self) -> Self {
        Loader {
            development_defaults: false,
            ..self
        }
    }

    pub fn load(&self) -> Result<EnvironmentConfig, ConfigurationError> {
        self.load_settings().map(|settings| settings.environment)
    }

    pub fn load_settings(&self) -> Result<Settings, ConfigurationError> {
        let file: SettingsFile = self.resolved()?.extract()?;
        let environment = EnvironmentConfig::validate(file.environment)?;

        Ok(Settings {
            environment,
            server: file.server,
            logging: file.logging,
        })
    }

    fn resolved(&self) -> Result<Figment, ConfigurationError> {
        if !self.development_defaults {
            return Ok(self.figment.clone());
        }

        let declared: RawEnvironment = self.figment.extract()?;
        if declared.app_env()?.is_production() {
            debug!("Production build declared, development defaults disabled");
            return Ok(self.figment.clone());
        }

        Ok(Figment::from(Serialized::defaults(RawEnvironment::development()))
            .merge(self.figment.clone()))
    }
}

fn settings_key_for(var: &UncasedStr) -> Uncased<'_> {
    let key = ENV_KEYS
        .iter()
        .find(|(name, _)| var.as_str().eq_ignore_ascii_case(name))
        .map(|(_, key)| *key);
    match key {
        Some(key) => Uncased::from_borrowed(key),
        None => Uncased::from_borrowed(var.as_str()),
    }
}

/// Path of the settings file, honouring `BREWENV_CONFIG`.
pub fn config_path() -> PathBuf {
    Env::var(CONFIG_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Build the process configuration from the settings file and the
/// environment.
pub fn load_settings() -> Result<Settings, ConfigurationError> {
    load_settings_from(None)
}

/// Like `load_settings`, reading `path` instead of the default settings
/// file when given.
pub fn load_settings_from(path: Option<PathBuf>) -> Result<Settings, ConfigurationError> {
    let path = path.unwrap_or_else(config_path);
    debug!(path = %path.display(), "Reading settings file");
    Loader::new().file(path).env().load_settings()
}

/// Produce the validated front-end environment for this process.
pub fn load_config() -> Result<EnvironmentConfig, ConfigurationError> {
    load_settings().map(|settings| settings.environment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    const PRODUCTION_YAML: &str = r#"
production: true
apiServerUrl: "https://api.coffee.example"
auth0:
  url: "coffee.eu"
  audience: "drinks"
  clientId: "prod-client"
  callbackURL: "https://coffee.example/tabs/user-page"
server:
  bind_address: "127.0.0.1:9000"
logging:
  level: "debug"
  format: "json"
"#;

    fn from_yaml(yaml: &str) -> Loader {
        Loader::from_figment(Figment::new().merge(Yaml::string(yaml)))
    }

    #[test]
    fn production_file_is_loaded_as_written() {
        let settings = from_yaml(PRODUCTION_YAML).load_settings().unwrap();

        assert!(settings.environment.production());
        assert_eq!(
            settings.environment.api_server_url(),
            "https://api.coffee.example"
        );
        assert_eq!(settings.environment.auth0().client_id(), "prod-client");
        assert_eq!(settings.server.bind_address, "127.0.0.1:9000");
        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.logging.format, "json");
    }

    #[test]
    fn production_gets_no_defaults() {
        let err = from_yaml("production: true\napiServerUrl: https://api.coffee.example\n")
            .load()
            .unwrap_err();
        assert_eq!(err.field(), Some("auth0.url"));
    }

    #[test]
    fn development_fills_absent_fields_from_profile() {
        let config = from_yaml("production: false\nauth0:\n  audience: Espresso\n")
            .load()
            .unwrap();

        assert_eq!(config.api_server_url(), "http://127.0.0.1:5000");
        assert_eq!(config.auth0().audience(), "Espresso");
        assert_eq!(config.auth0().client_id(), "A1p6vlo5BMp9pPqPTP5ZWwBMWG31r0sw");
    }

    #[test]
    fn explicit_empty_value_beats_default() {
        let err = from_yaml("production: false\napiServerUrl: \"\"\n")
            .load()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::Missing {
                field: "apiServerUrl"
            }
        ));
    }

    #[test]
    fn undeclared_profile_is_rejected() {
        let err = from_yaml("apiServerUrl: http://127.0.0.1:5000\n")
            .load()
            .unwrap_err();
        assert_eq!(err.field(), Some("production"));
    }

    #[test]
    fn without_defaults_requires_every_field() {
        let err = from_yaml("production: false\n")
            .without_defaults()
            .load()
            .unwrap_err();
        assert_eq!(err.field(), Some("apiServerUrl"));
    }

    #[test]
    fn ill_typed_source_is_a_configuration_error() {
        let err = from_yaml("production: \"maybe\"\n").load().unwrap_err();
        assert!(matches!(err, ConfigurationError::Source(_)));
    }

    #[test]
    fn env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("environment.yaml", PRODUCTION_YAML)?;
            jail.set_env("AUTH0_CLIENT_ID", "from-env");
            jail.set_env("BIND_ADDRESS", "0.0.0.0:7000");

            let settings = load_settings().map_err(|e| e.to_string())?;
            assert_eq!(settings.environment.auth0().client_id(), "from-env");
            assert_eq!(settings.environment.auth0().url(), "coffee.eu");
            assert_eq!(settings.server.bind_address, "0.0.0.0:7000");
            Ok(())
        });
    }

    #[test]
    fn app_env_selects_development_profile() {
        Jail::expect_with(|jail| {
            jail.set_env("APP_ENV", "development");
            jail.set_env("API_SERVER_URL", "http://10.0.0.2:5000");

            let config = load_config().map_err(|e| e.to_string())?;
            assert!(!config.production());
            assert_eq!(config.api_server_url(), "http://10.0.0.2:5000");
            assert_eq!(config.auth0().audience(), "Coffeeshp");
            Ok(())
        });
    }

    #[test]
    fn config_path_can_be_overridden() {
        Jail::expect_with(|jail| {
            jail.create_file("prod.yaml", PRODUCTION_YAML)?;
            jail.set_env(CONFIG_PATH_VAR, "prod.yaml");

            let config = load_config().map_err(|e| e.to_string())?;
            assert!(config.production());
            assert_eq!(config.auth0().audience(), "drinks");
            Ok(())
        });
    }

    #[test]
    fn explicit_path_wins_over_default_file() {
        Jail::expect_with(|jail| {
            jail.create_file("environment.yaml", "production: false\n")?;
            jail.create_file("prod.yaml", PRODUCTION_YAML)?;

            let settings =
                load_settings_from(Some(PathBuf::from("prod.yaml"))).map_err(|e| e.to_string())?;
            assert!(settings.environment.production());
            Ok(())
        });
    }

    #[test]
    fn production_without_env_values_fails_fast() {
        Jail::expect_with(|jail| {
            jail.set_env("APP_ENV", "production");
            jail.set_env("API_SERVER_URL", "https://api.coffee.example");

            match load_config() {
                Err(ConfigurationError::Missing { field: "auth0.url" }) => Ok(()),
                other => Err(format!("unexpected result: {:?}", other).into()),
            }
        });
    }

    #[test]
    fn numeric_env_values_stay_strings() {
        Jail::expect_with(|jail| {
            jail.set_env("APP_ENV", "dev");
            jail.set_env("AUTH0_AUDIENCE", "12345");

            let config = load_config().map_err(|e| e.to_string())?;
            assert_eq!(config.auth0().audience(), "12345");
            Ok(())
        });
    }

    #[test]
    fn loading_is_idempotent() {
        let loader = from_yaml(PRODUCTION_YAML);
        assert_eq!(loader.load().unwrap(), loader.load().unwrap());
    }
}
