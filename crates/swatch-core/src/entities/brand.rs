use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A marker manufacturer. Brands are shared by all users.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Brand {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// How a caller names the brand of a marker.
///
/// `ById` must refer to an existing brand; `ByName` is looked up
/// case-insensitively and created when missing.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
#[serde(tag = "by", content = "value", rename_all = "snake_case")]
pub enum BrandRef {
    ById(String),
    ByName(String),
}

impl BrandRef {
    /// Parse an import/CLI field: `id:<brand-id>` is an ID, anything else a name.
    ///
    /// Returns `None` for blank input.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match raw.strip_prefix("id:") {
            Some(id) => Some(Self::ById(id.trim().to_string())),
            None => Some(Self::ByName(raw.to_string())),
        }
    }

    /// Key used to resolve each distinct brand once per batch.
    #[must_use]
    pub fn cache_key(&self) -> String {
        match self {
            Self::ById(id) => format!("id:{id}"),
            Self::ByName(name) => format!("name:{}", name.to_lowercase()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_explicit_id_and_names() {
        assert_eq!(
            BrandRef::parse("id:brd-0a1b2c3d"),
            Some(BrandRef::ById("brd-0a1b2c3d".into()))
        );
        assert_eq!(
            BrandRef::parse("  Copic Ciao "),
            Some(BrandRef::ByName("Copic Ciao".into()))
        );
        assert_eq!(BrandRef::parse("   "), None);
    }

    #[test]
    fn long_names_with_c_are_still_names() {
        let name = "Chartpak AD Marker Collection Classic";
        assert_eq!(BrandRef::parse(name), Some(BrandRef::ByName(name.into())));
    }

    #[test]
    fn cache_key_ignores_name_case() {
        let a = BrandRef::ByName("Copic".into());
        let b = BrandRef::ByName("COPIC".into());
        assert_eq!(a.cache_key(), b.cache_key());
    }
}
