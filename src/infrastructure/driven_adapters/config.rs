//! Database Configuration
//!
//! Loads the database settings once from a file and environment variables.

use std::sync::Arc;

use config::{Config, Environment, File};
use once_cell::sync::{Lazy, OnceCell};
use serde::Deserialize;

use crate::domain::gateways::ConfigProvider;
use crate::domain::models::settings::{DatabaseSettings, Password, DEFAULT_MAX_CONNECTIONS};

/// Config file read by the process-wide provider (extension optional)
pub const DEFAULT_CONFIG_PATH: &str = "config/database";

/// Prefix of overriding environment variables (e.g. `DB__URL`)
pub const DEFAULT_ENV_PREFIX: &str = "DB";

static GLOBAL: Lazy<FileConfigProvider> = Lazy::new(FileConfigProvider::default);

/// The process-wide provider reading [`DEFAULT_CONFIG_PATH`]
#[must_use]
pub fn global() -> &'static FileConfigProvider {
    &GLOBAL
}

/// Settings as found in the sources, before defaults are applied
#[derive(Debug, Default, Deserialize)]
struct RawDatabaseConfig {
    driver: Option<String>,
    url: Option<String>,
    username: Option<String>,
    password: Option<String>,
    /// Maximum number of cached connections
    connections: Option<String>,
}

impl RawDatabaseConfig {
    fn into_settings(self) -> DatabaseSettings {
        let max_connections = match self.connections.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_MAX_CONNECTIONS,
            Some(value) => value.parse::<usize>().unwrap_or_else(|e| {
                tracing::warn!(
                    value,
                    error = %e,
                    default = DEFAULT_MAX_CONNECTIONS,
                    "Max connections must be a non-negative number, using default"
                );
                DEFAULT_MAX_CONNECTIONS
            }),
        };

        DatabaseSettings {
            driver: self.driver.unwrap_or_default(),
            url: self.url.unwrap_or_default(),
            username: self.username.unwrap_or_default(),
            password: Password::from(self.password.unwrap_or_default()),
            max_connections,
        }
    }
}

/// Reads settings from a config file overridden by environment variables
///
/// The sources are read on the first [`get`](ConfigProvider::get) only.
#[derive(Debug)]
pub struct FileConfigProvider {
    path: String,
    env_prefix: String,
    settings: OnceCell<Arc<DatabaseSettings>>,
}

impl FileConfigProvider {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
            settings: OnceCell::new(),
        }
    }

    /// Use a different environment variable prefix
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    fn load(&self) -> DatabaseSettings {
        tracing::info!(path = %self.path, env_prefix = %self.env_prefix, "Loading database configuration");

        let raw = Config::builder()
            .add_source(File::with_name(&self.path).required(false))
            .add_source(Environment::with_prefix(&self.env_prefix).separator("__"))
            .build()
            .and_then(|config| config.try_deserialize::<RawDatabaseConfig>())
            .unwrap_or_else(|e| {
                tracing::error!(path = %self.path, error = %e, "Failed to load database configuration");
                RawDatabaseConfig::default()
            });

        let settings = raw.into_settings();
        tracing::info!(
            driver = %settings.driver,
            url = %settings.url,
            max_connections = settings.max_connections,
            "Database configuration loaded"
        );
        settings
    }
}

impl Default for FileConfigProvider {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_PATH)
    }
}

impl ConfigProvider for FileConfigProvider {
    fn get(&self) -> Arc<DatabaseSettings> {
        self.settings.get_or_init(|| Arc::new(self.load())).clone()
    }
}

/// Hands out settings built by the host
#[derive(Debug, Clone)]
pub struct StaticConfigProvider {
    settings: Arc<DatabaseSettings>,
}

impl StaticConfigProvider {
    #[must_use]
    pub fn new(settings: DatabaseSettings) -> Self {
        Self {
            settings: Arc::new(settings),
        }
    }
}

impl ConfigProvider for StaticConfigProvider {
    fn get(&self) -> Arc<DatabaseSettings> {
        self.settings.clone()
    }
}
