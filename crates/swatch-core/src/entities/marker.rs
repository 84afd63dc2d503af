use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::color;
use crate::enums::ColorFamily;

/// Where a marker physically lives. Exactly one mode, always.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MarkerStorage {
    Grid {
        grid_id: String,
        column: u32,
        row: u32,
    },
    Simple {
        storage_id: String,
    },
}

impl MarkerStorage {
    /// The occupied grid cell, if this is a grid placement.
    #[must_use]
    pub fn grid_position(&self) -> Option<(&str, u32, u32)> {
        match self {
            Self::Grid {
                grid_id,
                column,
                row,
            } => Some((grid_id.as_str(), *column, *row)),
            Self::Simple { .. } => None,
        }
    }
}

/// A physical marker in someone's collection.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Marker {
    pub id: String,
    pub owner_id: String,
    /// User-facing identifier printed on the cap (e.g. `"R27"`). Unique per owner.
    pub number: String,
    pub color_name: String,
    /// Normalized `#RRGGBB`.
    pub hex: String,
    pub brand_id: Option<String>,
    pub family_override: Option<ColorFamily>,
    pub storage: MarkerStorage,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Marker {
    /// The manual override when set, otherwise the family derived from `hex`.
    #[must_use]
    pub fn effective_family(&self) -> ColorFamily {
        color::effective_family(self.family_override, &self.hex)
    }
}
