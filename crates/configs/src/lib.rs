//! # configs
//!
//! Layered runtime settings: built-in defaults, then `config/default.toml`,
//! then `config/<environment>.toml`, then `CAMPUS__SECTION__KEY` environment
//! variables (a `.env` file is read first when present).

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

const ENV_PREFIX: &str = "CAMPUS";
const MIN_JWT_SECRET_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub log: LogSettings,
    pub cors: CorsSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    pub url: SecretString,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: SecretString,
    pub cookie_name: String,
    /// Where the edge gate sends callers without a valid session.
    pub login_path: String,
    /// Path prefixes that require a valid session cookie.
    pub protected_prefixes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
    pub json: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    pub allowed_origins: Vec<String>,
}

impl Settings {
    /// Loads settings from files and the process environment.
    pub fn load() -> Result<Self, SettingsError> {
        // A missing .env is normal outside development.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(format!("{ENV_PREFIX}__ENVIRONMENT"))
            .unwrap_or_else(|_| "development".to_string());

        let config = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{environment}")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("auth.protected_prefixes")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        Self::from_config(config)
    }

    /// Built-in defaults; every other source is layered on top of these.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, SettingsError> {
        Ok(Config::builder()
            .set_default("environment", "development")?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("database.max_connections", 10)?
            .set_default("auth.cookie_name", "auth_token")?
            .set_default("auth.login_path", "/login")?
            .set_default("auth.protected_prefixes", vec!["/admin"])?
            .set_default("log.filter", "info")?
            .set_default("log.json", false)?
            .set_default("cors.allowed_origins", Vec::<String>::new())?)
    }

    pub fn from_config(config: Config) -> Result<Self, SettingsError> {
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.auth.jwt_secret.expose_secret().len() < MIN_JWT_SECRET_LEN {
            return Err(SettingsError::Invalid(format!(
                "auth.jwt_secret must be at least {MIN_JWT_SECRET_LEN} bytes"
            )));
        }
        if self.auth.cookie_name.trim().is_empty() {
            return Err(SettingsError::Invalid("auth.cookie_name must not be empty".into()));
        }
        if !self.auth.login_path.starts_with('/') {
            return Err(SettingsError::Invalid("auth.login_path must start with '/'".into()));
        }
        if let Some(prefix) = self
            .auth
            .protected_prefixes
            .iter()
            .find(|prefix| !prefix.starts_with('/'))
        {
            return Err(SettingsError::Invalid(format!(
                "protected prefix '{prefix}' must start with '/'"
            )));
        }
        // The login page itself must stay reachable.
        if self
            .auth
            .protected_prefixes
            .iter()
            .any(|prefix| path_has_prefix(&self.auth.login_path, prefix))
        {
            return Err(SettingsError::Invalid(
                "auth.login_path must not sit under a protected prefix".into(),
            ));
        }
        Ok(())
    }
}

/// Segment-aware prefix test: `/admin` covers `/admin` and `/admin/x`, not `/administrator`.
pub fn path_has_prefix(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
