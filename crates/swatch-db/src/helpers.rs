//! Row-to-entity parsing helpers.
//!
//! Every repo needs to convert `libsql::Row` (column-indexed) into typed entity
//! structs. These helpers isolate the parsing logic and handle the dual datetime
//! format issue (`SQLite`'s `datetime('now')` vs Rust's `to_rfc3339()`).

use chrono::{DateTime, Utc};

use crate::error::DatabaseError;

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00+00:00"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse a TEXT column into a serde-deserializable enum.
///
/// Works with all swatch-core enums that use `#[serde(rename_all = "snake_case")]`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string does not match any enum variant.
pub fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| DatabaseError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Read a required INTEGER column that must fit in `u32`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` for negative or oversized values.
pub fn get_u32(row: &libsql::Row, idx: i32) -> Result<u32, DatabaseError> {
    let value = row.get::<i64>(idx)?;
    u32::try_from(value)
        .map_err(|_| DatabaseError::Query(format!("Column {idx} out of range for u32: {value}")))
}

/// Nullable variant of [`get_u32`].
///
/// # Errors
///
/// Returns `DatabaseError::Query` for negative or oversized values.
pub fn get_opt_u32(row: &libsql::Row, idx: i32) -> Result<Option<u32>, DatabaseError> {
    row.get::<Option<i64>>(idx)?
        .map(|value| {
            u32::try_from(value).map_err(|_| {
                DatabaseError::Query(format!("Column {idx} out of range for u32: {value}"))
            })
        })
        .transpose()
}

/// Extract an optional JSON value from a TEXT column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string contains invalid JSON.
pub fn parse_optional_json(s: Option<&str>) -> Result<Option<serde_json::Value>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => {
            let val = serde_json::from_str(s)
                .map_err(|e| DatabaseError::Query(format!("Invalid JSON in column: {e}")))?;
            Ok(Some(val))
        }
        _ => Ok(None),
    }
}

/// Serialize a value for an audit `detail` column.
///
/// # Errors
///
/// Returns `DatabaseError::Other` if serialization fails.
pub fn to_detail<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, DatabaseError> {
    serde_json::to_value(value).map_err(|e| DatabaseError::Other(e.into()))
}

/// Trim a required name, rejecting blank input.
///
/// # Errors
///
/// Returns a validation error naming `what` when `value` is blank.
pub fn required_name(value: &str, what: &str) -> Result<String, DatabaseError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DatabaseError::validation(format!("{what} must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// Ownership clause for actor-scoped queries.
///
/// Returns `("AND {column} = ?{idx}", [actor.id])` for regular users and an
/// empty clause for admins, who see everything.
#[must_use]
pub fn owner_filter(
    actor: &swatch_core::identity::Actor,
    column: &str,
    idx: usize,
) -> (String, Vec<libsql::Value>) {
    if actor.is_admin {
        (String::new(), Vec::new())
    } else {
        (
            format!("AND {column} = ?{idx}"),
            vec![libsql::Value::Text(actor.id.clone())],
        )
    }
}
