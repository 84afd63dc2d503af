//! Bulk import: validate the whole batch, then apply it in one transaction.
//!
//! Rows whose number matches an existing marker update that marker (and move
//! it if the location changed); every other row creates a marker. A rejected
//! batch writes nothing.

use std::collections::HashMap;

use chrono::Utc;
use serde_json::json;
use swatch_core::entities::Marker;
use swatch_core::enums::{AuditAction, EntityType};
use swatch_core::identity::Actor;
use swatch_core::ids::PREFIX_MARKER;
use swatch_core::import::{ImportOptions, parse_import};
use swatch_core::placement::{BulkPlan, ImportRow, plan_bulk_placement};
use swatch_core::responses::ImportSummary;

use crate::error::DatabaseError;
use crate::repos::marker::storage_columns;
use crate::service::SwatchService;

impl SwatchService {
    /// Parse `text` and import it. See [`Self::bulk_place`].
    ///
    /// # Errors
    ///
    /// `Import` for unparseable lines, otherwise as [`Self::bulk_place`].
    pub async fn import_text(
        &self,
        actor: &Actor,
        text: &str,
        options: &ImportOptions,
    ) -> Result<ImportSummary, DatabaseError> {
        let rows = parse_import(text, options)?;
        self.bulk_place(actor, &rows).await
    }

    /// Validate every row against current inventory and apply the batch.
    ///
    /// # Errors
    ///
    /// `Import` when any row is rejected; nothing is written in that case.
    pub async fn bulk_place(
        &self,
        actor: &Actor,
        rows: &[ImportRow],
    ) -> Result<ImportSummary, DatabaseError> {
        let snapshot = self.load_snapshot(actor).await?;
        let plan = plan_bulk_placement(rows, actor, &snapshot)?;
        if plan.is_empty() {
            return Ok(ImportSummary::default());
        }

        let tx = self.db().conn().transaction().await?;
        let result = self.apply_plan(actor, &plan).await;
        let summary = Self::finish(tx, result).await?;

        tracing::info!(
            actor = %actor.id,
            created = summary.created,
            updated = summary.updated,
            moved = summary.moved,
            brands_created = summary.brands_created,
            "import applied"
        );
        Ok(summary)
    }

    async fn apply_plan(
        &self,
        actor: &Actor,
        plan: &BulkPlan,
    ) -> Result<ImportSummary, DatabaseError> {
        let mut summary = ImportSummary::default();

        let mut brands = HashMap::new();
        for brand in plan.brand_refs() {
            let (resolved, created) = self.resolve_brand(actor, brand).await?;
            if created {
                summary.brands_created += 1;
            }
            brands.insert(brand.cache_key(), resolved.id);
        }
        let brand_id = |brand: Option<&swatch_core::entities::BrandRef>| {
            brand.and_then(|b| brands.get(&b.cache_key()).cloned())
        };

        // Updates first: a create never targets a cell an update vacates, so
        // order only matters for the audit trail.
        for update in &plan.updates {
            let [grid_id, column, row, storage_id] = storage_columns(&update.storage);
            let result = self
                .db()
                .conn()
                .execute(
                    "UPDATE markers
                     SET color_name = ?1, hex = ?2, brand_id = COALESCE(?3, brand_id),
                         grid_id = ?4, column_number = ?5, row_number = ?6,
                         simple_storage_id = ?7, updated_at = ?8
                     WHERE id = ?9",
                    libsql::params![
                        update.color_name.as_str(),
                        update.hex.as_str(),
                        brand_id(update.brand.as_ref()),
                        grid_id,
                        column,
                        row,
                        storage_id,
                        Utc::now().to_rfc3339(),
                        update.marker_id.as_str()
                    ],
                )
                .await;
            if let Err(e) = result {
                return Err(self.write_error(e, &update.number, &update.storage).await);
            }
            summary.updated += 1;
            if update.moved {
                summary.moved += 1;
            }
            self.record(
                Some(actor),
                EntityType::Marker,
                &update.marker_id,
                AuditAction::Imported,
                Some(json!({ "line": update.line, "storage": update.storage, "moved": update.moved })),
            )
            .await?;
        }

        for create in &plan.creates {
            let now = Utc::now();
            let marker = Marker {
                id: self.db().generate_id(PREFIX_MARKER).await?,
                owner_id: actor.id.clone(),
                number: create.number.clone(),
                color_name: create.color_name.clone(),
                hex: create.hex.clone(),
                brand_id: brand_id(create.brand.as_ref()),
                family_override: None,
                storage: create.storage.clone(),
                notes: None,
                created_at: now,
                updated_at: now,
            };
            self.insert_marker(&marker).await?;
            summary.created += 1;
            self.record(
                Some(actor),
                EntityType::Marker,
                &marker.id,
                AuditAction::Imported,
                Some(json!({ "line": create.line, "storage": marker.storage })),
            )
            .await?;
        }

        Ok(summary)
    }
}
