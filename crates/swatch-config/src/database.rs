//! Local database location.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

pub const MEMORY: &str = ":memory:";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Database file. Empty means `<data dir>/swatch/swatch.db`; `:memory:`
    /// keeps everything in memory for the life of the process.
    #[serde(default)]
    pub path: String,
}

impl DatabaseConfig {
    pub fn is_memory(&self) -> bool {
        self.path.trim() == MEMORY
    }

    /// The path to hand to libSQL.
    ///
    /// A leading `~/` is expanded to the home directory.
    ///
    /// # Errors
    ///
    /// `NotConfigured` when no path is set and the platform has no data
    /// directory (or `~` cannot be expanded).
    pub fn resolve_path(&self) -> Result<PathBuf, ConfigError> {
        let path = self.path.trim();
        if path.is_empty() {
            return dirs::data_dir()
                .map(|dir| dir.join("swatch").join("swatch.db"))
                .ok_or_else(|| not_configured("no data directory on this platform; set database.path"));
        }
        if path == MEMORY {
            return Ok(PathBuf::from(MEMORY));
        }
        match path.strip_prefix("~/") {
            Some(rest) => dirs::home_dir()
                .map(|home| home.join(rest))
                .ok_or_else(|| not_configured("cannot expand '~' without a home directory")),
            None => Ok(PathBuf::from(path)),
        }
    }
}

fn not_configured(reason: &str) -> ConfigError {
    ConfigError::NotConfigured {
        section: "database".into(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_and_memory_paths() {
        let config = DatabaseConfig {
            path: "/tmp/markers.db".into(),
        };
        assert_eq!(config.resolve_path().unwrap(), PathBuf::from("/tmp/markers.db"));

        let config = DatabaseConfig {
            path: " :memory: ".into(),
        };
        assert!(config.is_memory());
        assert_eq!(config.resolve_path().unwrap(), PathBuf::from(MEMORY));
    }

    #[test]
    fn default_lands_in_data_dir() {
        if dirs::data_dir().is_none() {
            return;
        }
        let path = DatabaseConfig::default().resolve_path().unwrap();
        assert!(path.ends_with("swatch/swatch.db"), "{}", path.display());
    }
}
