//! Defaults for `swt import`.

use serde::{Deserialize, Serialize};
use swatch_core::import::ImportOptions;

use crate::ConfigError;

fn default_delimiter() -> String {
    ",".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImportConfig {
    /// Field separator: a single character, or `tab`.
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Whether import files start with a header line.
    #[serde(default)]
    pub has_header: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            has_header: false,
        }
    }
}

impl ImportConfig {
    /// # Errors
    ///
    /// `InvalidValue` unless the delimiter is exactly one character or `tab`.
    pub fn options(&self) -> Result<ImportOptions, ConfigError> {
        Ok(ImportOptions {
            delimiter: parse_delimiter(&self.delimiter)?,
            has_header: self.has_header,
        })
    }
}

/// Parse a delimiter as written in config or on the command line.
///
/// # Errors
///
/// `InvalidValue` unless `raw` is exactly one character or `tab`.
pub fn parse_delimiter(raw: &str) -> Result<char, ConfigError> {
    if raw.eq_ignore_ascii_case("tab") || raw == "\\t" {
        return Ok('\t');
    }
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c != '\n' && c != '\r' => Ok(c),
        _ => Err(ConfigError::InvalidValue {
            field: "import.delimiter".into(),
            reason: format!("expected a single character or 'tab', got '{raw}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiters() {
        assert_eq!(parse_delimiter(",").unwrap(), ',');
        assert_eq!(parse_delimiter("TAB").unwrap(), '\t');
        assert_eq!(parse_delimiter("\t").unwrap(), '\t');
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter(";;").is_err());
    }

    #[test]
    fn default_options_match_core_defaults() {
        assert_eq!(
            ImportConfig::default().options().unwrap(),
            ImportOptions::default()
        );
    }
}
