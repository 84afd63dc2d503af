//! Grid repository.
//!
//! Grids are owned by a user. Resizing runs `validate_grid_resize` so a grid
//! can never shrink out from under a placed marker, and deleting an occupied
//! grid is refused.

use chrono::Utc;
use serde_json::json;
use swatch_core::entities::Grid;
use swatch_core::enums::{AuditAction, EntityType};
use swatch_core::identity::Actor;
use swatch_core::ids::PREFIX_GRID;
use swatch_core::placement::{
    InventorySnapshot, PlacementError, PlacementLookup, Resolution, validate_grid_resize,
};
use swatch_core::responses::GridLayout;

use crate::constraints::is_foreign_key_violation;
use crate::error::DatabaseError;
use crate::helpers::{get_u32, owner_filter, parse_datetime, required_name, to_detail};
use crate::service::SwatchService;
use crate::updates::grid::GridUpdate;

pub(crate) const GRID_COLS: &str =
    "id, owner_id, name, column_count, row_count, created_at, updated_at";

pub(crate) fn row_to_grid(row: &libsql::Row) -> Result<Grid, DatabaseError> {
    Ok(Grid {
        id: row.get::<String>(0)?,
        owner_id: row.get::<String>(1)?,
        name: row.get::<String>(2)?,
        columns: get_u32(row, 3)?,
        rows: get_u32(row, 4)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
        updated_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

impl SwatchService {
    /// Create a `columns × rows` grid owned by `actor`.
    ///
    /// # Errors
    ///
    /// `Placement(InvalidDimensions)` for a zero dimension, a validation error
    /// for a blank name.
    pub async fn create_grid(
        &self,
        actor: &Actor,
        name: &str,
        columns: u32,
        rows: u32,
    ) -> Result<Grid, DatabaseError> {
        let name = required_name(name, "Grid name")?;
        if columns == 0 || rows == 0 {
            return Err(PlacementError::InvalidDimensions { columns, rows }.into());
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_GRID).await?;
        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO grids ({GRID_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
                libsql::params![
                    id.as_str(),
                    actor.id.as_str(),
                    name.as_str(),
                    i64::from(columns),
                    i64::from(rows),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        self.record(
            Some(actor),
            EntityType::Grid,
            &id,
            AuditAction::Created,
            Some(json!({ "name": name, "columns": columns, "rows": rows })),
        )
        .await?;

        Ok(Grid {
            id,
            owner_id: actor.id.clone(),
            name,
            columns,
            rows,
            created_at: now,
            updated_at: now,
        })
    }

    /// Fetch a grid by ID. Grids the actor may not access are `NotFound`.
    pub async fn get_grid(&self, actor: &Actor, id: &str) -> Result<Grid, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {GRID_COLS} FROM grids WHERE id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Grid, id))?;
        let grid = row_to_grid(&row)?;
        if !actor.can_access(&grid.owner_id) {
            return Err(DatabaseError::not_found(EntityType::Grid, id));
        }
        Ok(grid)
    }

    /// Resolve a grid by exact ID, else by case-insensitive name.
    ///
    /// # Errors
    ///
    /// `NotFound` when nothing matches, `Placement(Ambiguous)` when the name
    /// matches several grids.
    pub async fn find_grid(&self, actor: &Actor, id_or_name: &str) -> Result<Grid, DatabaseError> {
        let grids = self.visible_grids(actor).await?;
        let lookup = InventorySnapshot::new(actor.id.clone(), grids, Vec::new(), Vec::new());
        match lookup.find_grid(id_or_name) {
            Resolution::Found(grid) => Ok(grid.clone()),
            Resolution::Missing => Err(DatabaseError::not_found(EntityType::Grid, id_or_name)),
            Resolution::Ambiguous(count) => Err(PlacementError::Ambiguous(format!(
                "Grid name \"{id_or_name}\" matches {count} grids; use the grid ID"
            ))
            .into()),
        }
    }

    pub async fn list_grids(&self, actor: &Actor, limit: u32) -> Result<Vec<Grid>, DatabaseError> {
        let (owner_clause, params) = owner_filter(actor, "owner_id", 1);
        let sql = format!(
            "SELECT {GRID_COLS} FROM grids WHERE 1=1 {owner_clause} ORDER BY name LIMIT {limit}"
        );
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut grids = Vec::new();
        while let Some(row) = rows.next().await? {
            grids.push(row_to_grid(&row)?);
        }
        Ok(grids)
    }

    pub(crate) async fn visible_grids(&self, actor: &Actor) -> Result<Vec<Grid>, DatabaseError> {
        self.list_grids(actor, u32::MAX).await
    }

    /// Rename and/or resize a grid.
    ///
    /// # Errors
    ///
    /// `Placement(Stranded)` when the new dimensions would leave a marker
    /// outside the grid, `Placement(InvalidDimensions)` for a zero dimension.
    pub async fn update_grid(
        &self,
        actor: &Actor,
        grid_id: &str,
        update: GridUpdate,
    ) -> Result<Grid, DatabaseError> {
        let grid = self.get_grid(actor, grid_id).await?;

        if update.resizes() {
            let columns = update.columns.unwrap_or(grid.columns);
            let rows = update.rows.unwrap_or(grid.rows);
            let occupants = self.grid_slots(&grid.id).await?;
            validate_grid_resize(&grid, columns, rows, &occupants)?;
        }

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1;

        if let Some(ref name) = update.name {
            sets.push(format!("name = ?{idx}"));
            params.push(required_name(name, "Grid name")?.into());
            idx += 1;
        }
        if let Some(columns) = update.columns {
            sets.push(format!("column_count = ?{idx}"));
            params.push(i64::from(columns).into());
            idx += 1;
        }
        if let Some(rows) = update.rows {
            sets.push(format!("row_count = ?{idx}"));
            params.push(i64::from(rows).into());
            idx += 1;
        }

        if sets.is_empty() {
            return Ok(grid);
        }

        sets.push(format!("updated_at = ?{idx}"));
        params.push(Utc::now().to_rfc3339().into());
        idx += 1;

        params.push(grid_id.into());
        let sql = format!("UPDATE grids SET {} WHERE id = ?{idx}", sets.join(", "));
        self.db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;

        self.record(
            Some(actor),
            EntityType::Grid,
            grid_id,
            AuditAction::Updated,
            Some(to_detail(&update)?),
        )
        .await?;

        self.get_grid(actor, grid_id).await
    }

    /// Delete an empty grid.
    ///
    /// # Errors
    ///
    /// `InvalidState` while any marker occupies the grid.
    pub async fn delete_grid(&self, actor: &Actor, grid_id: &str) -> Result<(), DatabaseError> {
        let grid = self.get_grid(actor, grid_id).await?;
        let occupied = self.grid_slots(&grid.id).await?.len();
        if occupied > 0 {
            return Err(DatabaseError::InvalidState(format!(
                "Grid \"{}\" still holds {occupied} marker(s)",
                grid.name
            )));
        }

        self.db()
            .conn()
            .execute("DELETE FROM grids WHERE id = ?1", [grid_id])
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    DatabaseError::InvalidState(format!("Grid \"{}\" still holds markers", grid.name))
                } else {
                    e.into()
                }
            })?;

        self.record(Some(actor), EntityType::Grid, grid_id, AuditAction::Deleted, None)
            .await
    }

    /// The grid and every occupied cell, row-major.
    pub async fn grid_occupancy(
        &self,
        actor: &Actor,
        grid_id: &str,
    ) -> Result<GridLayout, DatabaseError> {
        let grid = self.get_grid(actor, grid_id).await?;
        let markers = self.markers_in_grid(&grid.id).await?;
        Ok(GridLayout::new(grid, &markers))
    }
}
