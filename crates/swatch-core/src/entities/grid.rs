use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A named rack of `columns × rows` cells, each holding at most one marker.
///
/// Positions are 1-based: `(1, 1)` is the first cell.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Grid {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub columns: u32,
    pub rows: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Grid {
    /// Whether `(column, row)` lies inside this grid.
    #[must_use]
    pub const fn contains(&self, column: u32, row: u32) -> bool {
        column >= 1 && column <= self.columns && row >= 1 && row <= self.rows
    }

    /// Number of cells in the grid.
    #[must_use]
    pub fn capacity(&self) -> u64 {
        u64::from(self.columns) * u64::from(self.rows)
    }
}
