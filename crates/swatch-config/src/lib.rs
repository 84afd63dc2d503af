//! # swatch-config
//!
//! Layered configuration loading for Swatch using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`SWATCH_*` prefix, `__` as separator)
//! 2. Project-level `.swatch/config.toml`
//! 3. User-level `~/.config/swatch/config.toml`
//! 4. Built-in defaults
//!
//! Figment maps `SWATCH_DATABASE__PATH` -> `database.path`,
//! `SWATCH_GENERAL__USER` -> `general.user`, and so on.
//!
//! ```no_run
//! use swatch_config::SwatchConfig;
//!
//! let config = SwatchConfig::load_with_dotenv().expect("config");
//! println!("database: {}", config.database.resolve_path().expect("path").display());
//! ```

mod database;
mod error;
mod general;
mod import;

pub use database::{DatabaseConfig, MEMORY};
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use import::{ImportConfig, parse_delimiter};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SwatchConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub import: ImportConfig,
}

impl SwatchConfig {
    /// Load configuration from TOML files and environment variables.
    ///
    /// Does not read `.env`; see [`Self::load_with_dotenv`].
    ///
    /// # Errors
    ///
    /// `Figment` when a source fails to parse or a value has the wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load `.env` from the current directory, then [`Self::load`].
    ///
    /// # Errors
    ///
    /// As [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        // A missing .env is normal.
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so callers can merge extra providers (e.g. CLI flags) on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".swatch/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("SWATCH_").split("__"))
    }

    /// Path to the user-global config file.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("swatch").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = SwatchConfig::default();
        assert!(config.database.path.is_empty());
        assert!(!config.general.has_user());
        assert_eq!(config.import.delimiter, ",");
    }

    #[test]
    fn figment_builds_without_files() {
        figment::Jail::expect_with(|_jail| {
            let config: SwatchConfig = SwatchConfig::figment().extract()?;
            assert_eq!(config.general.default_limit, 20);
            assert!(!config.import.has_header);
            Ok(())
        });
    }
}
