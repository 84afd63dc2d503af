//! Simple storage repository.
//!
//! Unstructured bins with no coordinates and no capacity. A bin that still
//! holds markers cannot be deleted.

use chrono::Utc;
use serde_json::json;
use swatch_core::entities::{Marker, SimpleStorage};
use swatch_core::enums::{AuditAction, EntityType};
use swatch_core::identity::Actor;
use swatch_core::ids::PREFIX_STORAGE;
use swatch_core::placement::{InventorySnapshot, PlacementError, PlacementLookup, Resolution};

use crate::constraints::is_foreign_key_violation;
use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, owner_filter, parse_datetime, required_name, to_detail};
use crate::service::SwatchService;
use crate::updates::storage::StorageUpdate;

pub(crate) const STORAGE_COLS: &str = "id, owner_id, name, description, created_at, updated_at";

pub(crate) fn row_to_storage(row: &libsql::Row) -> Result<SimpleStorage, DatabaseError> {
    Ok(SimpleStorage {
        id: row.get::<String>(0)?,
        owner_id: row.get::<String>(1)?,
        name: row.get::<String>(2)?,
        description: get_opt_string(row, 3)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
        updated_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

impl SwatchService {
    pub async fn create_storage(
        &self,
        actor: &Actor,
        name: &str,
        description: Option<&str>,
    ) -> Result<SimpleStorage, DatabaseError> {
        let name = required_name(name, "Storage name")?;
        let description = description.map(str::trim).filter(|d| !d.is_empty());

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_STORAGE).await?;
        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO simple_storages ({STORAGE_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
                libsql::params![
                    id.as_str(),
                    actor.id.as_str(),
                    name.as_str(),
                    description,
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        self.record(
            Some(actor),
            EntityType::SimpleStorage,
            &id,
            AuditAction::Created,
            Some(json!({ "name": name })),
        )
        .await?;

        Ok(SimpleStorage {
            id,
            owner_id: actor.id.clone(),
            name,
            description: description.map(String::from),
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_storage(
        &self,
        actor: &Actor,
        id: &str,
    ) -> Result<SimpleStorage, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {STORAGE_COLS} FROM simple_storages WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::SimpleStorage, id))?;
        let storage = row_to_storage(&row)?;
        if !actor.can_access(&storage.owner_id) {
            return Err(DatabaseError::not_found(EntityType::SimpleStorage, id));
        }
        Ok(storage)
    }

    /// Resolve a storage by exact ID, else by case-insensitive name.
    pub async fn find_storage(
        &self,
        actor: &Actor,
        id_or_name: &str,
    ) -> Result<SimpleStorage, DatabaseError> {
        let storages = self.visible_storages(actor).await?;
        let lookup = InventorySnapshot::new(actor.id.clone(), Vec::new(), storages, Vec::new());
        match lookup.find_storage(id_or_name) {
            Resolution::Found(storage) => Ok(storage.clone()),
            Resolution::Missing => Err(DatabaseError::not_found(
                EntityType::SimpleStorage,
                id_or_name,
            )),
            Resolution::Ambiguous(count) => Err(PlacementError::Ambiguous(format!(
                "Storage name \"{id_or_name}\" matches {count} storages; use the storage ID"
            ))
            .into()),
        }
    }

    pub async fn list_storages(
        &self,
        actor: &Actor,
        limit: u32,
    ) -> Result<Vec<SimpleStorage>, DatabaseError> {
        let (owner_clause, params) = owner_filter(actor, "owner_id", 1);
        let sql = format!(
            "SELECT {STORAGE_COLS} FROM simple_storages WHERE 1=1 {owner_clause} ORDER BY name LIMIT {limit}"
        );
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut storages = Vec::new();
        while let Some(row) = rows.next().await? {
            storages.push(row_to_storage(&row)?);
        }
        Ok(storages)
    }

    pub(crate) async fn visible_storages(
        &self,
        actor: &Actor,
    ) -> Result<Vec<SimpleStorage>, DatabaseError> {
        self.list_storages(actor, u32::MAX).await
    }

    pub async fn update_storage(
        &self,
        actor: &Actor,
        storage_id: &str,
        update: StorageUpdate,
    ) -> Result<SimpleStorage, DatabaseError> {
        let storage = self.get_storage(actor, storage_id).await?;

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1;

        if let Some(ref name) = update.name {
            sets.push(format!("name = ?{idx}"));
            params.push(required_name(name, "Storage name")?.into());
            idx += 1;
        }
        if let Some(ref description) = update.description {
            sets.push(format!("description = ?{idx}"));
            params.push(description.as_deref().into());
            idx += 1;
        }

        if sets.is_empty() {
            return Ok(storage);
        }

        sets.push(format!("updated_at = ?{idx}"));
        params.push(Utc::now().to_rfc3339().into());
        idx += 1;

        params.push(storage_id.into());
        let sql = format!(
            "UPDATE simple_storages SET {} WHERE id = ?{idx}",
            sets.join(", ")
        );
        self.db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;

        self.record(
            Some(actor),
            EntityType::SimpleStorage,
            storage_id,
            AuditAction::Updated,
            Some(to_detail(&update)?),
        )
        .await?;

        self.get_storage(actor, storage_id).await
    }

    /// Delete an empty storage.
    ///
    /// # Errors
    ///
    /// `InvalidState` while any marker is stored in it.
    pub async fn delete_storage(&self, actor: &Actor, storage_id: &str) -> Result<(), DatabaseError> {
        let storage = self.get_storage(actor, storage_id).await?;
        let held = self.markers_in_storage(&storage.id).await?.len();
        if held > 0 {
            return Err(DatabaseError::InvalidState(format!(
                "Storage \"{}\" still holds {held} marker(s)",
                storage.name
            )));
        }

        self.db()
            .conn()
            .execute("DELETE FROM simple_storages WHERE id = ?1", [storage_id])
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    DatabaseError::InvalidState(format!(
                        "Storage \"{}\" still holds markers",
                        storage.name
                    ))
                } else {
                    e.into()
                }
            })?;

        self.record(
            Some(actor),
            EntityType::SimpleStorage,
            storage_id,
            AuditAction::Deleted,
            None,
        )
        .await
    }

    /// Markers currently kept in a storage.
    pub async fn storage_contents(
        &self,
        actor: &Actor,
        storage_id: &str,
    ) -> Result<Vec<Marker>, DatabaseError> {
        let storage = self.get_storage(actor, storage_id).await?;
        self.markers_in_storage(&storage.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{admin_and_user, service_with_owner, test_service};
    use crate::updates::storage::StorageUpdateBuilder;

    #[tokio::test]
    async fn create_update_delete() {
        let (svc, owner) = service_with_owner().await;
        let cup = svc
            .create_storage(&owner, "Pencil Cup", Some("  "))
            .await
            .unwrap();
        assert!(cup.id.starts_with("sto-"));
        assert_eq!(cup.description, None);

        let update = StorageUpdateBuilder::new()
            .description(Some("Left of the lamp".into()))
            .build();
        let updated = svc.update_storage(&owner, &cup.id, update).await.unwrap();
        assert_eq!(updated.description.as_deref(), Some("Left of the lamp"));

        assert_eq!(svc.find_storage(&owner, "PENCIL cup").await.unwrap().id, cup.id);

        svc.delete_storage(&owner, &cup.id).await.unwrap();
        assert!(svc.get_storage(&owner, &cup.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn foreign_storage_is_not_found() {
        let svc = test_service().await;
        let (admin, user) = admin_and_user(&svc).await;
        let bin = svc.create_storage(&admin, "Shoebox", None).await.unwrap();

        assert!(svc.get_storage(&user, &bin.id).await.unwrap_err().is_not_found());
        assert!(svc.find_storage(&user, "Shoebox").await.unwrap_err().is_not_found());
    }
}
