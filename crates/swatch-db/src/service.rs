//! Service layer orchestrating database mutations with audit.
//!
//! `SwatchService` wraps `SwatchDb`. All repo methods are implemented as
//! `impl SwatchService` blocks under [`crate::repos`].

use crate::SwatchDb;
use crate::error::DatabaseError;

/// Orchestrates database mutations with the audit trail.
///
/// Every mutation method follows this protocol:
/// 1. Check the actor may touch the target
/// 2. Validate (placement rules run against an `InventorySnapshot`)
/// 3. Execute SQL
/// 4. Append audit entry
///
/// Multi-row writes (bulk import, color pages) wrap steps 3-4 in one
/// transaction.
pub struct SwatchService {
    db: SwatchDb,
}

impl SwatchService {
    /// Create a new service wrapping a local database.
    ///
    /// `db_path` is a libSQL database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = SwatchDb::open_local(db_path).await?;
        Ok(Self { db })
    }

    /// Create from an existing `SwatchDb`.
    #[must_use]
    pub const fn from_db(db: SwatchDb) -> Self {
        Self { db }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &SwatchDb {
        &self.db
    }

    /// Run `COMMIT` or `ROLLBACK` on `tx` depending on `result`.
    ///
    /// Statements issued on the service connection while `tx` is open are part
    /// of it.
    pub(crate) async fn finish<T>(
        tx: libsql::Transaction,
        result: Result<T, DatabaseError>,
    ) -> Result<T, DatabaseError> {
        match result {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback) = tx.rollback().await {
                    tracing::warn!(error = %rollback, "rollback failed");
                }
                Err(err)
            }
        }
    }
}
