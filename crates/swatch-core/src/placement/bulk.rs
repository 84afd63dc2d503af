//! Validate-everything-then-apply planning for bulk imports.
//!
//! [`plan_bulk_placement`] checks a whole batch against a [`PlacementLookup`]
//! and either returns a [`BulkPlan`] that can be written without further
//! checks, or an [`ImportError`] describing why nothing may be written.

use std::collections::{HashMap, HashSet};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::{BrandRef, MarkerStorage};
use crate::identity::Actor;

use super::{
    Located, PlacementError, PlacementErrorKind, PlacementLookup, PlacementRequest, check_bounds,
    locate,
};

/// One parsed import line.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ImportRow {
    /// 1-based line number in the source text.
    pub line: usize,
    pub number: String,
    pub color_name: String,
    /// Normalized `#RRGGBB`.
    pub hex: String,
    pub brand: Option<BrandRef>,
    pub placement: PlacementRequest,
}

/// A marker the batch will insert.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PlannedCreate {
    pub line: usize,
    pub number: String,
    pub color_name: String,
    pub hex: String,
    pub brand: Option<BrandRef>,
    pub storage: MarkerStorage,
}

/// An existing marker the batch will overwrite.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PlannedUpdate {
    pub line: usize,
    pub marker_id: String,
    pub number: String,
    pub color_name: String,
    pub hex: String,
    pub brand: Option<BrandRef>,
    pub storage: MarkerStorage,
    /// Whether `storage` differs from where the marker is now.
    pub moved: bool,
}

/// A fully validated batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct BulkPlan {
    pub creates: Vec<PlannedCreate>,
    pub updates: Vec<PlannedUpdate>,
}

impl BulkPlan {
    /// Distinct brand references in first-seen order, deduplicated by
    /// [`BrandRef::cache_key`].
    #[must_use]
    pub fn brand_refs(&self) -> Vec<&BrandRef> {
        let mut seen = HashSet::new();
        self.updates
            .iter()
            .filter_map(|u| u.brand.as_ref())
            .chain(self.creates.iter().filter_map(|c| c.brand.as_ref()))
            .filter(|brand| seen.insert(brand.cache_key()))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.creates.len() + self.updates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.creates.is_empty() && self.updates.is_empty()
    }
}

/// Why a batch was rejected. Nothing from the batch has been written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Error)]
#[error("{}", .problems.join(", "))]
pub struct ImportError {
    pub kind: PlacementErrorKind,
    pub problems: Vec<String>,
}

impl ImportError {
    #[must_use]
    pub fn single(kind: PlacementErrorKind, problem: impl Into<String>) -> Self {
        Self {
            kind,
            problems: vec![problem.into()],
        }
    }

    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.kind.status_code()
    }
}

struct Target<'r> {
    row: &'r ImportRow,
    storage: MarkerStorage,
}

/// Check a batch of import rows and plan the writes.
///
/// Rows are validated in stages: container resolution, bounds and brand
/// IDs (problems aggregated across rows), duplicate numbers, same-cell collisions within
/// the batch, collisions between new markers and stored ones, and
/// finally collisions for existing markers that move.
///
/// # Errors
///
/// The first stage that finds a problem determines the returned
/// [`ImportError`].
pub fn plan_bulk_placement<L: PlacementLookup + ?Sized>(
    rows: &[ImportRow],
    actor: &Actor,
    lookup: &L,
) -> Result<BulkPlan, ImportError> {
    let targets = resolve_targets(rows, actor, lookup)?;
    reject_duplicate_numbers(&targets)?;
    reject_batch_collisions(&targets)?;

    let (creates, updates): (Vec<_>, Vec<_>) = targets
        .into_iter()
        .partition(|t| lookup.find_marker_by_number(&t.row.number).is_none());

    reject_stored_collisions(&creates, lookup)?;

    let mut plan = BulkPlan {
        creates: creates
            .into_iter()
            .map(|t| PlannedCreate {
                line: t.row.line,
                number: t.row.number.clone(),
                color_name: t.row.color_name.clone(),
                hex: t.row.hex.clone(),
                brand: t.row.brand.clone(),
                storage: t.storage,
            })
            .collect(),
        updates: Vec::with_capacity(updates.len()),
    };

    for target in updates {
        let Some(existing) = lookup.find_marker_by_number(&target.row.number) else {
            continue;
        };
        let moved = existing.storage != target.storage;
        let conflict = if moved {
            target
                .storage
                .grid_position()
                .and_then(|(grid_id, column, row)| {
                    lookup
                        .find_marker_at(grid_id, column, row, Some(existing.id.as_str()))
                        .map(|occupant| PlacementError::Conflict {
                            column,
                            row,
                            occupant: occupant.number.clone(),
                        })
                })
        } else {
            None
        };
        if let Some(err) = conflict {
            return Err(ImportError::single(
                err.kind(),
                format!("Row {}: {err}", target.row.line),
            ));
        }
        plan.updates.push(PlannedUpdate {
            line: target.row.line,
            marker_id: existing.id.clone(),
            number: target.row.number.clone(),
            color_name: target.row.color_name.clone(),
            hex: target.row.hex.clone(),
            brand: target.row.brand.clone(),
            storage: target.storage,
            moved,
        });
    }

    Ok(plan)
}

fn resolve_targets<'r, L: PlacementLookup + ?Sized>(
    rows: &'r [ImportRow],
    actor: &Actor,
    lookup: &L,
) -> Result<Vec<Target<'r>>, ImportError> {
    let mut targets = Vec::with_capacity(rows.len());
    let mut problems = Vec::new();
    let mut kind = None;

    for item in rows {
        let checked = locate(&item.placement, actor, lookup)
            .and_then(|located| {
                if let Located::Grid { grid, column, row } = &located {
                    check_bounds(grid, *column, *row)?;
                }
                Ok(located.storage())
            })
            .and_then(|storage| check_brand(item.brand.as_ref(), lookup).map(|()| storage));
        match checked {
            Ok(storage) => targets.push(Target { row: item, storage }),
            Err(err) => {
                kind.get_or_insert(err.kind());
                problems.push(format!("Row {}: {err}", item.line));
            }
        }
    }

    match kind {
        Some(kind) => Err(ImportError { kind, problems }),
        None => Ok(targets),
    }
}

/// Brands named by ID must already exist; names are created on apply.
fn check_brand<L: PlacementLookup + ?Sized>(
    brand: Option<&BrandRef>,
    lookup: &L,
) -> Result<(), PlacementError> {
    match brand {
        Some(BrandRef::ById(id)) if !lookup.has_brand(id) => {
            Err(PlacementError::not_found("Brand", id))
        }
        _ => Ok(()),
    }
}

fn reject_duplicate_numbers(targets: &[Target<'_>]) -> Result<(), ImportError> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for target in targets {
        if let Some(first) = seen.insert(target.row.number.as_str(), target.row.line) {
            return Err(ImportError::single(
                PlacementErrorKind::Ambiguous,
                format!(
                    "Marker \"{}\" appears on rows {first} and {}",
                    target.row.number, target.row.line
                ),
            ));
        }
    }
    Ok(())
}

fn reject_batch_collisions(targets: &[Target<'_>]) -> Result<(), ImportError> {
    let mut claimed: HashMap<(&str, u32, u32), &Target<'_>> = HashMap::new();
    for target in targets {
        let Some(cell) = target.storage.grid_position() else {
            continue;
        };
        if let Some(first) = claimed.insert(cell, target) {
            let (_, column, row) = cell;
            return Err(ImportError::single(
                PlacementErrorKind::Conflict,
                format!(
                    "Markers \"{}\" (row {}) and \"{}\" (row {}) both target position ({column}, {row})",
                    first.row.number, first.row.line, target.row.number, target.row.line
                ),
            ));
        }
    }
    Ok(())
}

fn reject_stored_collisions<L: PlacementLookup + ?Sized>(
    creates: &[Target<'_>],
    lookup: &L,
) -> Result<(), ImportError> {
    let problems = creates
        .iter()
        .filter_map(|target| {
            let (grid_id, column, row) = target.storage.grid_position()?;
            let occupant = lookup.find_marker_at(grid_id, column, row, None)?;
            Some(
                PlacementError::Conflict {
                    column,
                    row,
                    occupant: occupant.number.clone(),
                }
                .to_string(),
            )
        })
        .collect::<Vec<_>>();

    if problems.is_empty() {
        Ok(())
    } else {
        Err(ImportError {
            kind: PlacementErrorKind::Conflict,
            problems,
        })
    }
}
