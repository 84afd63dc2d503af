//! Database error types for swatch-db.

use swatch_core::enums::EntityType;
use swatch_core::errors::CoreError;
use swatch_core::placement::{ImportError, PlacementError};
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Invalid state encountered (e.g., bad data in DB, blocked delete).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The actor may not perform this operation.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// A single placement was rejected.
    #[error(transparent)]
    Placement(#[from] PlacementError),

    /// A bulk import was rejected; nothing was written.
    #[error("Import rejected: {0}")]
    Import(#[from] ImportError),

    /// Not-found and validation failures shared with swatch-core.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    pub(crate) fn not_found(entity: EntityType, id: &str) -> Self {
        Self::Core(CoreError::NotFound {
            entity_type: entity.as_str().to_string(),
            id: id.to_string(),
        })
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Core(CoreError::Validation(message.into()))
    }

    /// Whether this error means the referenced object does not exist (or is
    /// not visible to the actor).
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NoResult | Self::Core(CoreError::NotFound { .. }) | Self::Placement(PlacementError::NotFound { .. })
        )
    }
}
