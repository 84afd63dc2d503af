//! Brand repository.
//!
//! Brands are shared across users and matched by name case-insensitively.

use chrono::Utc;
use serde_json::json;
use swatch_core::entities::{Brand, BrandRef};
use swatch_core::enums::{AuditAction, EntityType};
use swatch_core::identity::Actor;
use swatch_core::ids::PREFIX_BRAND;

use crate::constraints::is_foreign_key_violation;
use crate::error::DatabaseError;
use crate::helpers::{parse_datetime, required_name};
use crate::service::SwatchService;

const SELECT_COLS: &str = "id, name, created_at";

fn row_to_brand(row: &libsql::Row) -> Result<Brand, DatabaseError> {
    Ok(Brand {
        id: row.get::<String>(0)?,
        name: row.get::<String>(1)?,
        created_at: parse_datetime(&row.get::<String>(2)?)?,
    })
}

impl SwatchService {
    pub async fn get_brand(&self, id: &str) -> Result<Brand, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM brands WHERE id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Brand, id))?;
        row_to_brand(&row)
    }

    pub async fn find_brand_by_name(&self, name: &str) -> Result<Option<Brand>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM brands WHERE name = ?1"),
                [name.trim()],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_brand(&row)?)),
            None => Ok(None),
        }
    }

    /// Look up a brand by name, creating it when missing.
    ///
    /// Returns the brand and whether it was created by this call.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank name, or `DatabaseError` if a
    /// query fails.
    pub async fn find_or_create_brand(
        &self,
        actor: &Actor,
        name: &str,
    ) -> Result<(Brand, bool), DatabaseError> {
        let name = required_name(name, "Brand name")?;
        if let Some(existing) = self.find_brand_by_name(&name).await? {
            return Ok((existing, false));
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_BRAND).await?;
        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO brands ({SELECT_COLS}) VALUES (?1, ?2, ?3)"),
                libsql::params![id.as_str(), name.as_str(), now.to_rfc3339()],
            )
            .await?;

        self.record(
            Some(actor),
            EntityType::Brand,
            &id,
            AuditAction::Created,
            Some(json!({ "name": name })),
        )
        .await?;
        tracing::debug!(brand = %name, "brand created");

        Ok((
            Brand {
                id,
                name,
                created_at: now,
            },
            true,
        ))
    }

    /// Resolve a caller-supplied brand reference.
    ///
    /// `ById` must exist; `ByName` is created when missing. Returns the brand
    /// and whether it was created.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown ID.
    pub async fn resolve_brand(
        &self,
        actor: &Actor,
        brand: &BrandRef,
    ) -> Result<(Brand, bool), DatabaseError> {
        match brand {
            BrandRef::ById(id) => Ok((self.get_brand(id).await?, false)),
            BrandRef::ByName(name) => self.find_or_create_brand(actor, name).await,
        }
    }

    pub async fn list_brands(&self, limit: u32) -> Result<Vec<Brand>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM brands ORDER BY name LIMIT {limit}"),
                (),
            )
            .await?;
        let mut brands = Vec::new();
        while let Some(row) = rows.next().await? {
            brands.push(row_to_brand(&row)?);
        }
        Ok(brands)
    }

    /// Delete an unused brand. Admin only.
    ///
    /// # Errors
    ///
    /// `PermissionDenied` for non-admins, `InvalidState` while markers still
    /// reference the brand.
    pub async fn delete_brand(&self, actor: &Actor, id: &str) -> Result<(), DatabaseError> {
        if !actor.is_admin {
            return Err(DatabaseError::PermissionDenied(
                "only admins can delete brands".into(),
            ));
        }
        let brand = self.get_brand(id).await?;

        self.db()
            .conn()
            .execute("DELETE FROM brands WHERE id = ?1", [id])
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    DatabaseError::InvalidState(format!(
                        "Brand \"{}\" is still used by markers",
                        brand.name
                    ))
                } else {
                    e.into()
                }
            })?;

        self.record(Some(actor), EntityType::Brand, id, AuditAction::Deleted, None)
            .await
    }
}
