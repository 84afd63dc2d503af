use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A saved, ordered collection of colors kept for reference.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ColorPage {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub description: Option<String>,
    pub colors: Vec<PageColor>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One swatch on a color page. `position` is 0-based and dense.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PageColor {
    pub position: u32,
    pub hex: String,
    pub label: Option<String>,
}
