//! # swatch-db
//!
//! libSQL persistence for Swatch: users, brands, grids, simple storages,
//! markers, color pages, and the audit trail.
//!
//! Placement decisions are made by `swatch-core`; this crate loads the
//! [`swatch_core::placement::InventorySnapshot`] they run against, writes
//! the result, and backs the one-marker-per-cell rule with a UNIQUE index.

pub mod constraints;
pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
pub mod updates;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Central database handle for all Swatch state.
///
/// Wraps a libSQL database and connection and provides ID generation.
pub struct SwatchDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl SwatchDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let swatch_db = Self { db, conn };
        swatch_db.run_migrations().await?;
        tracing::debug!(path, "database opened");
        Ok(swatch_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"mkr-a3f8b2c1"`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}
