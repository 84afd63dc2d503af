//! General application configuration.

use serde::{Deserialize, Serialize};

/// Default result limit.
const fn default_limit() -> u32 {
    20
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Username commands act as when `--user` is not given.
    #[serde(default)]
    pub user: String,

    /// Default result limit for list commands.
    #[serde(default = "default_limit")]
    pub default_limit: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            user: String::new(),
            default_limit: default_limit(),
        }
    }
}

impl GeneralConfig {
    pub fn has_user(&self) -> bool {
        !self.user.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = GeneralConfig::default();
        assert!(!config.has_user());
        assert_eq!(config.default_limit, 20);
    }
}
