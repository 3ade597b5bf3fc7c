//! # augur-config
//!
//! Layered configuration loading for Augur using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`AUGUR_*` prefix, `__` as separator)
//! 2. Project-level `.augur/config.toml`
//! 3. User-level `~/.config/augur/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `AUGUR_DATABASE__URL` -> `database.url`,
//! `AUGUR_GENERAL__UNUSED_BATCH_SIZE` -> `general.unused_batch_size`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use augur_config::AugurConfig;
//!
//! let config = AugurConfig::load_with_dotenv().expect("config");
//! println!("database: {}", config.database.url);
//! ```

mod database;
mod error;
mod general;

pub use database::{DEFAULT_DATABASE_URL, DatabaseConfig, DatabaseTarget};
pub use error::ConfigError;
pub use general::{DEFAULT_UNUSED_BATCH, GeneralConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AugurConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl AugurConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source cannot be parsed into
    /// [`AugurConfig`], or `ConfigError::InvalidValue` if a value is out of
    /// range.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.general.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`]. A missing `.env` is not an error.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".augur/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("AUGUR_").split("__"))
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("augur").join("config.toml"))
    }

    /// Load `.env` from the workspace root, or the current directory.
    ///
    /// Silently does nothing if no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}
