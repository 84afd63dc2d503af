//! Response types returned as JSON by `swt` commands.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::color::{self, Hsl};
use crate::entities::{Grid, Marker};
use crate::enums::ColorFamily;

/// Response from `swt import`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ImportSummary {
    pub created: u32,
    pub updated: u32,
    pub moved: u32,
    pub brands_created: u32,
}

/// Response from `swt color classify`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ClassifyResponse {
    /// Normalized input, or the input as given when it did not parse.
    pub hex: String,
    pub hsl: Option<Hsl>,
    pub family: ColorFamily,
    pub matching_families: Vec<ColorFamily>,
}

impl ClassifyResponse {
    #[must_use]
    pub fn for_hex(hex: &str) -> Self {
        let normalized = color::normalize_hex(hex).unwrap_or_else(|_| hex.to_string());
        Self {
            hsl: color::hex_to_hsl(hex).ok(),
            family: color::classify(hex),
            matching_families: color::matching_families(hex),
            hex: normalized,
        }
    }
}

/// One cell of a grid layout.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GridCell {
    pub column: u32,
    pub row: u32,
    pub marker_id: String,
    pub number: String,
    pub hex: String,
    pub family: ColorFamily,
}

/// Response from `swt grid show`: the grid plus its occupied cells in
/// row-major order.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GridLayout {
    pub grid: Grid,
    pub cells: Vec<GridCell>,
    pub free: u64,
}

impl GridLayout {
    /// Build a layout from markers. Markers stored elsewhere are ignored.
    #[must_use]
    pub fn new(grid: Grid, markers: &[Marker]) -> Self {
        let mut cells: Vec<GridCell> = markers
            .iter()
            .filter_map(|marker| {
                let (grid_id, column, row) = marker.storage.grid_position()?;
                (grid_id == grid.id).then(|| GridCell {
                    column,
                    row,
                    marker_id: marker.id.clone(),
                    number: marker.number.clone(),
                    hex: marker.hex.clone(),
                    family: marker.effective_family(),
                })
            })
            .collect();
        cells.sort_by_key(|cell| (cell.row, cell.column));

        let free = grid.capacity().saturating_sub(cells.len() as u64);
        Self { grid, cells, free }
    }

    #[must_use]
    pub fn cell(&self, column: u32, row: u32) -> Option<&GridCell> {
        self.cells
            .iter()
            .find(|cell| cell.column == column && cell.row == row)
    }
}
