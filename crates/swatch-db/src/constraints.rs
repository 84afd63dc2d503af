//! Classification of libSQL constraint failures.
//!
//! libSQL reports constraint violations as `SqliteFailure` errors whose
//! message names the constraint. The predicates match on those messages so
//! repos can turn a lost race or a blocked delete into a domain error.

/// Another marker already holds the grid cell (`idx_markers_grid_cell`).
pub fn is_grid_cell_taken(e: &libsql::Error) -> bool {
    let msg = e.to_string();
    msg.contains("UNIQUE constraint failed") && msg.contains("markers.grid_id")
}

/// The owner already has a marker with this number.
pub fn is_duplicate_number(e: &libsql::Error) -> bool {
    let msg = e.to_string();
    msg.contains("UNIQUE constraint failed") && msg.contains("markers.number")
}

/// Any UNIQUE violation.
pub fn is_unique_violation(e: &libsql::Error) -> bool {
    e.to_string().contains("UNIQUE constraint failed")
}

/// A row is still referenced (or references something missing).
pub fn is_foreign_key_violation(e: &libsql::Error) -> bool {
    e.to_string().contains("FOREIGN KEY constraint failed")
}
