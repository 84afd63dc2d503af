//! Loading the [`InventorySnapshot`] placement rules run against.

use swatch_core::entities::MarkerStorage;
use swatch_core::identity::Actor;
use swatch_core::placement::{InventorySnapshot, MarkerSlot};

use crate::error::DatabaseError;
use crate::repos::marker::storage_from_row;
use crate::service::SwatchService;

const SLOT_COLS: &str =
    "id, owner_id, number, grid_id, column_number, row_number, simple_storage_id";

fn row_to_slot(row: &libsql::Row) -> Result<MarkerSlot, DatabaseError> {
    Ok(MarkerSlot {
        id: row.get::<String>(0)?,
        owner_id: row.get::<String>(1)?,
        number: row.get::<String>(2)?,
        storage: storage_from_row(row, 3)?,
    })
}

impl SwatchService {
    /// Load everything placement needs for `actor`: the containers they can
    /// use, their own markers, every marker sitting in those grids, and the
    /// IDs of all brands.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a query fails.
    pub async fn load_snapshot(&self, actor: &Actor) -> Result<InventorySnapshot, DatabaseError> {
        let grids = self.visible_grids(actor).await?;
        let storages = self.visible_storages(actor).await?;

        let mut rows = if actor.is_admin {
            self.db()
                .conn()
                .query(&format!("SELECT {SLOT_COLS} FROM markers"), ())
                .await?
        } else {
            self.db()
                .conn()
                .query(
                    &format!(
                        "SELECT {SLOT_COLS} FROM markers
                         WHERE owner_id = ?1
                            OR grid_id IN (SELECT id FROM grids WHERE owner_id = ?1)"
                    ),
                    [actor.id.as_str()],
                )
                .await?
        };

        let mut markers = Vec::new();
        while let Some(row) = rows.next().await? {
            markers.push(row_to_slot(&row)?);
        }

        let mut rows = self.db().conn().query("SELECT id FROM brands", ()).await?;
        let mut brand_ids = Vec::new();
        while let Some(row) = rows.next().await? {
            brand_ids.push(row.get::<String>(0)?);
        }

        tracing::debug!(
            actor = %actor.id,
            grids = grids.len(),
            storages = storages.len(),
            markers = markers.len(),
            brands = brand_ids.len(),
            "inventory snapshot loaded"
        );
        Ok(InventorySnapshot::new(actor.id.clone(), grids, storages, markers).with_brands(brand_ids))
    }

    /// Every marker in a grid, regardless of owner.
    pub(crate) async fn grid_slots(&self, grid_id: &str) -> Result<Vec<MarkerSlot>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SLOT_COLS} FROM markers WHERE grid_id = ?1"),
                [grid_id],
            )
            .await?;
        let mut slots = Vec::new();
        while let Some(row) = rows.next().await? {
            slots.push(row_to_slot(&row)?);
        }
        Ok(slots)
    }

    /// Number of the marker holding a cell, if any.
    pub(crate) async fn occupant_number(
        &self,
        storage: &MarkerStorage,
    ) -> Result<Option<String>, DatabaseError> {
        let Some((grid_id, column, row)) = storage.grid_position() else {
            return Ok(None);
        };
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT number FROM markers WHERE grid_id = ?1 AND column_number = ?2 AND row_number = ?3",
                libsql::params![grid_id, i64::from(column), i64::from(row)],
            )
            .await?;
        match rows.next().await? {
            Some(found) => Ok(Some(found.get::<String>(0)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{admin_and_user, test_service};
    use swatch_core::placement::{PlacementLookup, PlacementRequest};

    use crate::repos::marker::NewMarker;

    #[tokio::test]
    async fn snapshot_is_scoped_to_actor() {
        let svc = test_service().await;
        let (admin, user) = admin_and_user(&svc).await;

        let rack = svc.create_grid(&user, "Rack", 3, 3).await.unwrap();
        svc.create_grid(&admin, "Admin Rack", 3, 3).await.unwrap();
        svc.create_marker(
            &user,
            NewMarker::new("A1", "Red", "#FF0000", PlacementRequest::grid(&rack.id, 1, 1)),
        )
        .await
        .unwrap();

        let snapshot = svc.load_snapshot(&user).await.unwrap();
        assert_eq!(snapshot.grids().len(), 1);
        assert!(snapshot.find_marker_by_number("A1").is_some());
        assert!(snapshot.find_marker_at(&rack.id, 1, 1, None).is_some());

        let everything = svc.load_snapshot(&admin).await.unwrap();
        assert_eq!(everything.grids().len(), 2);
        assert!(everything.find_marker_by_number("A1").is_none());
        assert_eq!(everything.markers().len(), 1);
    }
}
