//! Cross-cutting error types for Swatch.
//!
//! Placement and import failures have their own types in
//! [`crate::placement`]; color parsing failures live in [`crate::color`].
//! A unified error is deferred to `swatch-cli` where all crate errors converge.

use thiserror::Error;

/// Errors that can be raised by any Swatch crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
