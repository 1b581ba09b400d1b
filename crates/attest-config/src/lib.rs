//! # attest-config
//!
//! Layered configuration loading for Attest using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`ATTEST_*` prefix, `__` as separator)
//! 2. Project-level `.attest/config.toml`
//! 3. User-level `~/.config/attest/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `ATTEST_SERVER__BIND` -> `server.bind`,
//! `ATTEST_DATABASE__PATH` -> `database.path`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! `ATTEST_LOG` is read by the server's tracing filter, not by figment; it
//! has no `__` so it never maps onto a section.
//!
//! # Usage
//!
//! ```no_run
//! use attest_config::AttestConfig;
//!
//! let config = AttestConfig::load_with_dotenv().expect("config");
//! println!("listening on {}", config.server.bind);
//! ```

mod database;
mod error;
mod general;
mod server;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use server::ServerConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Env var prefix for all Attest settings.
pub const ENV_PREFIX: &str = "ATTEST_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AttestConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl AttestConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] if you need `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is invalid.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Extract and validate from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is invalid.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError::InvalidValue` encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.general.validate()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests and the binary can layer extra providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".attest/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("attest").join("config.toml"))
    }
}
