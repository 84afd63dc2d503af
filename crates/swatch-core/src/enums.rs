//! Color families, entity types, and audit actions for Swatch.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`,
//! which is also the form stored in SQL columns.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ColorFamily
// ---------------------------------------------------------------------------

/// Coarse color bucket a marker is browsed under.
///
/// Derived from the marker's hex color by [`crate::color::classify`] unless
/// the marker carries a manual override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ColorFamily {
    Red,
    Orange,
    Yellow,
    Green,
    Cyan,
    Blue,
    Purple,
    Pink,
    Brown,
    Gray,
    Black,
    White,
    Unknown,
}

impl ColorFamily {
    /// Every family a valid color can be classified into (excludes `Unknown`).
    pub const ALL: [Self; 12] = [
        Self::Red,
        Self::Orange,
        Self::Yellow,
        Self::Green,
        Self::Cyan,
        Self::Blue,
        Self::Purple,
        Self::Pink,
        Self::Brown,
        Self::Gray,
        Self::Black,
        Self::White,
    ];

    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Cyan => "cyan",
            Self::Blue => "blue",
            Self::Purple => "purple",
            Self::Pink => "pink",
            Self::Brown => "brown",
            Self::Gray => "gray",
            Self::Black => "black",
            Self::White => "white",
            Self::Unknown => "unknown",
        }
    }

    /// Achromatic families never come out of hue banding.
    #[must_use]
    pub const fn is_grayscale(self) -> bool {
        matches!(self, Self::Gray | Self::Black | Self::White)
    }
}

impl fmt::Display for ColorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// Kind of entity referenced by audit entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    User,
    Brand,
    Grid,
    SimpleStorage,
    Marker,
    ColorPage,
}

impl EntityType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Brand => "brand",
            Self::Grid => "grid",
            Self::SimpleStorage => "simple_storage",
            Self::Marker => "marker",
            Self::ColorPage => "color_page",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditAction
// ---------------------------------------------------------------------------

/// What happened to an entity, as recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    Updated,
    Moved,
    Deleted,
    Imported,
}

impl AuditAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Moved => "moved",
            Self::Deleted => "deleted",
            Self::Imported => "imported",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_serde_matches_as_str() {
        for family in ColorFamily::ALL {
            let json = serde_json::to_value(family).unwrap();
            assert_eq!(json, serde_json::Value::String(family.as_str().into()));
        }
    }

    #[test]
    fn entity_type_serde_matches_as_str() {
        let json = serde_json::to_value(EntityType::SimpleStorage).unwrap();
        assert_eq!(json, "simple_storage");
    }

    #[test]
    fn grayscale_families() {
        assert!(ColorFamily::Gray.is_grayscale());
        assert!(ColorFamily::White.is_grayscale());
        assert!(!ColorFamily::Brown.is_grayscale());
    }
}
