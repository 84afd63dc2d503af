//! Storage placement rules.
//!
//! A marker lives in exactly one place: a grid cell or a simple storage bin.
//! This module decides whether a requested placement is allowed. It never
//! writes anything; `swatch-db` performs the write after receiving `Ok`, and
//! its UNIQUE index on `(grid_id, column_number, row_number)` settles races
//! between two writers that both passed validation.

mod bulk;
mod lookup;

pub use bulk::{BulkPlan, ImportError, ImportRow, PlannedCreate, PlannedUpdate, plan_bulk_placement};
pub use lookup::{InventorySnapshot, MarkerSlot, PlacementLookup, Resolution};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::{Grid, MarkerStorage, SimpleStorage};
use crate::identity::Actor;

/// Target a marker should move into.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PlacementRequest {
    Grid(GridPlacementRequest),
    Simple(SimplePlacementRequest),
}

/// Place into a grid cell. `grid` is an ID or a case-insensitive name.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GridPlacementRequest {
    pub grid: String,
    pub column: u32,
    pub row: u32,
}

/// Place into a simple storage bin. `storage` is an ID or a case-insensitive name.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SimplePlacementRequest {
    pub storage: String,
}

impl PlacementRequest {
    #[must_use]
    pub fn grid(grid: impl Into<String>, column: u32, row: u32) -> Self {
        Self::Grid(GridPlacementRequest {
            grid: grid.into(),
            column,
            row,
        })
    }

    #[must_use]
    pub fn simple(storage: impl Into<String>) -> Self {
        Self::Simple(SimplePlacementRequest {
            storage: storage.into(),
        })
    }
}

/// Category of a placement or import failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PlacementErrorKind {
    OutOfBounds,
    Conflict,
    NotFound,
    Ambiguous,
    Malformed,
}

impl PlacementErrorKind {
    /// HTTP status a request handler should answer with.
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::OutOfBounds | Self::Ambiguous | Self::Malformed => 400,
            Self::Conflict => 409,
            Self::NotFound => 404,
        }
    }
}

/// Why a single placement was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error(
        "Position ({column}, {row}) is outside grid \"{grid}\" (columns 1-{columns}, rows 1-{rows})"
    )]
    OutOfBounds {
        grid: String,
        column: u32,
        row: u32,
        columns: u32,
        rows: u32,
    },

    #[error("Grid dimensions must be at least 1x1, got {columns}x{rows}")]
    InvalidDimensions { columns: u32, rows: u32 },

    #[error("Position ({column}, {row}) is already occupied by marker \"{occupant}\"")]
    Conflict {
        column: u32,
        row: u32,
        occupant: String,
    },

    #[error(
        "Cannot resize grid \"{grid}\" to {columns}x{rows}: marker \"{occupant}\" occupies ({column}, {row})"
    )]
    Stranded {
        grid: String,
        columns: u32,
        rows: u32,
        column: u32,
        row: u32,
        occupant: String,
    },

    #[error("{entity} not found: {reference}")]
    NotFound { entity: String, reference: String },

    #[error("{0}")]
    Ambiguous(String),
}

impl PlacementError {
    #[must_use]
    pub const fn kind(&self) -> PlacementErrorKind {
        match self {
            Self::OutOfBounds { .. } | Self::InvalidDimensions { .. } => {
                PlacementErrorKind::OutOfBounds
            }
            Self::Conflict { .. } | Self::Stranded { .. } => PlacementErrorKind::Conflict,
            Self::NotFound { .. } => PlacementErrorKind::NotFound,
            Self::Ambiguous(_) => PlacementErrorKind::Ambiguous,
        }
    }

    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    fn not_found(entity: &str, reference: &str) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            reference: reference.to_string(),
        }
    }
}

/// A request whose container has been found but not yet checked for room.
pub(crate) enum Located<'l> {
    Grid { grid: &'l Grid, column: u32, row: u32 },
    Simple(&'l SimpleStorage),
}

impl Located<'_> {
    pub(crate) fn storage(&self) -> MarkerStorage {
        match self {
            Self::Grid { grid, column, row } => MarkerStorage::Grid {
                grid_id: grid.id.clone(),
                column: *column,
                row: *row,
            },
            Self::Simple(storage) => MarkerStorage::Simple {
                storage_id: storage.id.clone(),
            },
        }
    }
}

/// Find the container a request names. Containers the actor may not access
/// are reported as missing.
pub(crate) fn locate<'l, L: PlacementLookup + ?Sized>(
    request: &PlacementRequest,
    actor: &Actor,
    lookup: &'l L,
) -> Result<Located<'l>, PlacementError> {
    match request {
        PlacementRequest::Grid(req) => match lookup.find_grid(&req.grid) {
            Resolution::Found(grid) if actor.can_access(&grid.owner_id) => Ok(Located::Grid {
                grid,
                column: req.column,
                row: req.row,
            }),
            Resolution::Found(_) | Resolution::Missing => {
                Err(PlacementError::not_found("Grid", &req.grid))
            }
            Resolution::Ambiguous(count) => Err(PlacementError::Ambiguous(format!(
                "Grid name \"{}\" matches {count} grids; use the grid ID",
                req.grid
            ))),
        },
        PlacementRequest::Simple(req) => match lookup.find_storage(&req.storage) {
            Resolution::Found(storage) if actor.can_access(&storage.owner_id) => {
                Ok(Located::Simple(storage))
            }
            Resolution::Found(_) | Resolution::Missing => {
                Err(PlacementError::not_found("Storage", &req.storage))
            }
            Resolution::Ambiguous(count) => Err(PlacementError::Ambiguous(format!(
                "Storage name \"{}\" matches {count} storages; use the storage ID",
                req.storage
            ))),
        },
    }
}

pub(crate) fn check_bounds(grid: &Grid, column: u32, row: u32) -> Result<(), PlacementError> {
    if grid.contains(column, row) {
        return Ok(());
    }
    Err(PlacementError::OutOfBounds {
        grid: grid.name.clone(),
        column,
        row,
        columns: grid.columns,
        rows: grid.rows,
    })
}

/// Check that `(column, row)` is inside `grid` and free.
///
/// `exclude_marker_id` lets an update re-validate a marker without it
/// conflicting with its own current cell.
///
/// # Errors
///
/// [`PlacementError::OutOfBounds`] when the position is outside the grid,
/// [`PlacementError::Conflict`] when another marker holds the cell.
pub fn validate_grid_placement<L: PlacementLookup + ?Sized>(
    grid: &Grid,
    column: u32,
    row: u32,
    exclude_marker_id: Option<&str>,
    lookup: &L,
) -> Result<(), PlacementError> {
    check_bounds(grid, column, row)?;

    if let Some(occupant) = lookup.find_marker_at(&grid.id, column, row, exclude_marker_id) {
        return Err(PlacementError::Conflict {
            column,
            row,
            occupant: occupant.number.clone(),
        });
    }

    Ok(())
}

/// Resolve a request into a concrete storage for `actor`.
///
/// Grid targets pass [`validate_grid_placement`]; simple targets only need
/// to exist.
///
/// # Errors
///
/// `NotFound` / `Ambiguous` when the target does not resolve to exactly one
/// accessible container, plus anything [`validate_grid_placement`] returns.
pub fn resolve_placement<L: PlacementLookup + ?Sized>(
    request: &PlacementRequest,
    actor: &Actor,
    exclude_marker_id: Option<&str>,
    lookup: &L,
) -> Result<MarkerStorage, PlacementError> {
    let located = locate(request, actor, lookup)?;
    if let Located::Grid { grid, column, row } = &located {
        validate_grid_placement(grid, *column, *row, exclude_marker_id, lookup)?;
    }
    Ok(located.storage())
}

/// Check that `grid` may become `columns × rows` given its current occupants.
///
/// Shrinking is allowed only while every occupied cell stays inside the new
/// bounds; occupants are never evicted.
///
/// # Errors
///
/// [`PlacementError::InvalidDimensions`] for a zero dimension,
/// [`PlacementError::Stranded`] naming the first occupant left outside.
pub fn validate_grid_resize(
    grid: &Grid,
    columns: u32,
    rows: u32,
    occupants: &[MarkerSlot],
) -> Result<(), PlacementError> {
    if columns == 0 || rows == 0 {
        return Err(PlacementError::InvalidDimensions { columns, rows });
    }

    let mut stranded = occupants
        .iter()
        .filter_map(|slot| {
            let (grid_id, column, row) = slot.storage.grid_position()?;
            (grid_id == grid.id && (column > columns || row > rows)).then_some((slot, column, row))
        })
        .collect::<Vec<_>>();
    stranded.sort_by_key(|(_, column, row)| (*row, *column));

    match stranded.first() {
        Some((slot, column, row)) => Err(PlacementError::Stranded {
            grid: grid.name.clone(),
            columns,
            rows,
            column: *column,
            row: *row,
            occupant: slot.number.clone(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use chrono::Utc;

    use crate::entities::{Grid, MarkerStorage, SimpleStorage};

    use super::MarkerSlot;

    pub const OWNER: &str = "usr-00000001";

    pub fn grid(id: &str, name: &str, columns: u32, rows: u32) -> Grid {
        Grid {
            id: id.into(),
            owner_id: OWNER.into(),
            name: name.into(),
            columns,
            rows,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn storage(id: &str, name: &str) -> SimpleStorage {
        SimpleStorage {
            id: id.into(),
            owner_id: OWNER.into(),
            name: name.into(),
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn slot_at(id: &str, number: &str, grid_id: &str, column: u32, row: u32) -> MarkerSlot {
        MarkerSlot {
            id: id.into(),
            owner_id: OWNER.into(),
            number: number.into(),
            storage: MarkerStorage::Grid {
                grid_id: grid_id.into(),
                column,
                row,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_fixtures::*;
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn empty_with(grid: &Grid) -> InventorySnapshot {
        InventorySnapshot::new(OWNER, vec![grid.clone()], vec![], vec![])
    }

    #[rstest]
    #[case(0, 1)]
    #[case(5, 1)]
    #[case(1, 0)]
    #[case(1, 4)]
    fn out_of_bounds_edges(#[case] column: u32, #[case] row: u32) {
        let g = grid("grd-00000001", "Rack", 4, 3);
        let err = validate_grid_placement(&g, column, row, None, &empty_with(&g)).unwrap_err();
        assert_eq!(err.kind(), PlacementErrorKind::OutOfBounds);
        assert!(err.to_string().contains("columns 1-4, rows 1-3"), "{err}");
    }

    #[rstest]
    #[case(1, 1)]
    #[case(4, 3)]
    fn corners_of_empty_grid_are_ok(#[case] column: u32, #[case] row: u32) {
        let g = grid("grd-00000001", "Rack", 4, 3);
        assert_eq!(
            validate_grid_placement(&g, column, row, None, &empty_with(&g)),
            Ok(())
        );
    }

    #[test]
    fn occupied_cell_conflicts_unless_excluded() {
        let g = grid("grd-00000001", "Rack", 4, 3);
        let inventory = InventorySnapshot::new(
            OWNER,
            vec![g.clone()],
            vec![],
            vec![slot_at("mkr-00000001", "R27", &g.id, 2, 2)],
        );

        let err = validate_grid_placement(&g, 2, 2, None, &inventory).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Position (2, 2) is already occupied by marker \"R27\""
        );
        assert_eq!(err.status_code(), 409);

        assert_eq!(
            validate_grid_placement(&g, 2, 2, Some("mkr-00000001"), &inventory),
            Ok(())
        );
        assert!(validate_grid_placement(&g, 2, 2, Some("mkr-00000009"), &inventory).is_err());
    }

    #[test]
    fn resolve_grid_by_name_ignores_case() {
        let g = grid("grd-00000001", "Top Rack", 4, 3);
        let actor = Actor::new(OWNER, false);
        let storage = resolve_placement(
            &PlacementRequest::grid("top rack", 1, 1),
            &actor,
            None,
            &empty_with(&g),
        )
        .unwrap();
        assert_eq!(
            storage,
            MarkerStorage::Grid {
                grid_id: g.id,
                column: 1,
                row: 1
            }
        );
    }

    #[test]
    fn resolve_hides_other_users_containers() {
        let g = grid("grd-00000001", "Rack", 4, 3);
        let stranger = Actor::new("usr-00000002", false);
        let err = resolve_placement(
            &PlacementRequest::grid(g.id.clone(), 1, 1),
            &stranger,
            None,
            &empty_with(&g),
        )
        .unwrap_err();
        assert_eq!(err.kind(), PlacementErrorKind::NotFound);

        let admin = Actor::new("usr-00000003", true);
        assert!(
            resolve_placement(
                &PlacementRequest::grid(g.id.clone(), 1, 1),
                &admin,
                None,
                &empty_with(&g)
            )
            .is_ok()
        );
    }

    #[test]
    fn resolve_simple_storage() {
        let inventory = InventorySnapshot::new(
            OWNER,
            vec![],
            vec![storage("sto-00000001", "Pencil Cup")],
            vec![],
        );
        let actor = Actor::new(OWNER, false);

        let placed =
            resolve_placement(&PlacementRequest::simple("pencil cup"), &actor, None, &inventory)
                .unwrap();
        assert_eq!(
            placed,
            MarkerStorage::Simple {
                storage_id: "sto-00000001".into()
            }
        );

        let missing =
            resolve_placement(&PlacementRequest::simple("Shoebox"), &actor, None, &inventory)
                .unwrap_err();
        assert_eq!(missing.to_string(), "Storage not found: Shoebox");
    }

    #[test]
    fn duplicate_grid_names_are_ambiguous() {
        let inventory = InventorySnapshot::new(
            OWNER,
            vec![
                grid("grd-00000001", "Rack", 4, 3),
                grid("grd-00000002", "rack", 2, 2),
            ],
            vec![],
            vec![],
        );
        let err = resolve_placement(
            &PlacementRequest::grid("RACK", 1, 1),
            &Actor::new(OWNER, false),
            None,
            &inventory,
        )
        .unwrap_err();
        assert_eq!(err.kind(), PlacementErrorKind::Ambiguous);
    }

    #[test]
    fn resize_rejects_stranding_occupants() {
        let g = grid("grd-00000001", "Rack", 6, 6);
        let occupants = vec![
            slot_at("mkr-00000001", "A1", &g.id, 2, 2),
            slot_at("mkr-00000002", "B5", &g.id, 5, 1),
        ];

        assert_eq!(validate_grid_resize(&g, 5, 2, &occupants), Ok(()));
        assert_eq!(validate_grid_resize(&g, 10, 10, &occupants), Ok(()));

        let err = validate_grid_resize(&g, 4, 4, &occupants).unwrap_err();
        assert_eq!(err.kind(), PlacementErrorKind::Conflict);
        assert!(err.to_string().contains("\"B5\" occupies (5, 1)"), "{err}");
    }

    #[test]
    fn resize_rejects_zero_dimensions() {
        let g = grid("grd-00000001", "Rack", 6, 6);
        assert!(matches!(
            validate_grid_resize(&g, 0, 3, &[]),
            Err(PlacementError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn placement_request_serde_is_tagged() {
        let json = serde_json::to_value(PlacementRequest::grid("Rack", 1, 2)).unwrap();
        assert_eq!(json["mode"], "grid");
        assert_eq!(json["column"], 1);

        let back: PlacementRequest =
            serde_json::from_str(r#"{"mode":"simple","storage":"Cup"}"#).unwrap();
        assert_eq!(back, PlacementRequest::simple("Cup"));
    }
}
