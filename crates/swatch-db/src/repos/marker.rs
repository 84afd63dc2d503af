//! Marker repository.
//!
//! Every write that puts a marker into a grid cell first runs the placement
//! rules against a freshly loaded [`InventorySnapshot`]. The UNIQUE index on
//! the cell is the backstop: a writer that loses the race gets
//! `Placement(Conflict)` instead of overwriting.
//!
//! [`InventorySnapshot`]: swatch_core::placement::InventorySnapshot

use chrono::Utc;
use serde_json::json;
use swatch_core::color::{family_matches, normalize_hex};
use swatch_core::entities::{BrandRef, Marker, MarkerStorage};
use swatch_core::enums::{AuditAction, ColorFamily, EntityType};
use swatch_core::identity::Actor;
use swatch_core::ids::PREFIX_MARKER;
use swatch_core::placement::{PlacementError, PlacementLookup, PlacementRequest, resolve_placement};

use crate::constraints::{is_duplicate_number, is_grid_cell_taken};
use crate::error::DatabaseError;
use crate::helpers::{
    get_opt_string, get_opt_u32, owner_filter, parse_datetime, parse_enum, required_name,
    to_detail,
};
use crate::service::SwatchService;
use crate::updates::marker::MarkerUpdate;

pub(crate) const MARKER_COLS: &str = "id, owner_id, number, color_name, hex, brand_id, family_override, \
     grid_id, column_number, row_number, simple_storage_id, notes, created_at, updated_at";

/// Read the four storage columns starting at `base`
/// (`grid_id, column_number, row_number, simple_storage_id`).
pub(crate) fn storage_from_row(row: &libsql::Row, base: i32) -> Result<MarkerStorage, DatabaseError> {
    let grid_id = get_opt_string(row, base)?;
    let column = get_opt_u32(row, base + 1)?;
    let grid_row = get_opt_u32(row, base + 2)?;
    let storage_id = get_opt_string(row, base + 3)?;

    match (grid_id, column, grid_row, storage_id) {
        (Some(grid_id), Some(column), Some(row), None) => Ok(MarkerStorage::Grid {
            grid_id,
            column,
            row,
        }),
        (None, None, None, Some(storage_id)) => Ok(MarkerStorage::Simple { storage_id }),
        _ => Err(DatabaseError::InvalidState(
            "marker row has no single storage location".into(),
        )),
    }
}

/// Bind values for `grid_id, column_number, row_number, simple_storage_id`.
pub(crate) fn storage_columns(storage: &MarkerStorage) -> [libsql::Value; 4] {
    use libsql::Value;
    match storage {
        MarkerStorage::Grid {
            grid_id,
            column,
            row,
        } => [
            Value::Text(grid_id.clone()),
            Value::Integer(i64::from(*column)),
            Value::Integer(i64::from(*row)),
            Value::Null,
        ],
        MarkerStorage::Simple { storage_id } => [
            Value::Null,
            Value::Null,
            Value::Null,
            Value::Text(storage_id.clone()),
        ],
    }
}

fn row_to_marker(row: &libsql::Row) -> Result<Marker, DatabaseError> {
    Ok(Marker {
        id: row.get::<String>(0)?,
        owner_id: row.get::<String>(1)?,
        number: row.get::<String>(2)?,
        color_name: row.get::<String>(3)?,
        hex: row.get::<String>(4)?,
        brand_id: get_opt_string(row, 5)?,
        family_override: get_opt_string(row, 6)?
            .map(|s| parse_enum(&s))
            .transpose()?,
        storage: storage_from_row(row, 7)?,
        notes: get_opt_string(row, 11)?,
        created_at: parse_datetime(&row.get::<String>(12)?)?,
        updated_at: parse_datetime(&row.get::<String>(13)?)?,
    })
}

/// Whether a marker belongs in `family`: the override when set, otherwise
/// [`family_matches`] on its hex.
fn in_family(marker: &Marker, family: ColorFamily) -> bool {
    marker
        .family_override
        .map_or_else(|| family_matches(&marker.hex, family), |f| f == family)
}

fn random_index(len: usize) -> Result<usize, DatabaseError> {
    let mut buf = [0u8; 8];
    getrandom::fill(&mut buf)
        .map_err(|e| DatabaseError::Other(anyhow::anyhow!("random source unavailable: {e}")))?;
    let len = u64::try_from(len).map_err(|e| DatabaseError::Other(e.into()))?;
    usize::try_from(u64::from_le_bytes(buf) % len).map_err(|e| DatabaseError::Other(e.into()))
}

/// Input for [`SwatchService::create_marker`].
#[derive(Debug, Clone)]
pub struct NewMarker {
    pub number: String,
    pub color_name: String,
    pub hex: String,
    pub brand: Option<BrandRef>,
    pub family_override: Option<ColorFamily>,
    pub placement: PlacementRequest,
    pub notes: Option<String>,
}

impl NewMarker {
    #[must_use]
    pub fn new(
        number: impl Into<String>,
        color_name: impl Into<String>,
        hex: impl Into<String>,
        placement: PlacementRequest,
    ) -> Self {
        Self {
            number: number.into(),
            color_name: color_name.into(),
            hex: hex.into(),
            brand: None,
            family_override: None,
            placement,
            notes: None,
        }
    }

    #[must_use]
    pub fn brand(mut self, brand: BrandRef) -> Self {
        self.brand = Some(brand);
        self
    }

    #[must_use]
    pub const fn family_override(mut self, family: ColorFamily) -> Self {
        self.family_override = Some(family);
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Filter criteria for marker listings.
#[derive(Debug, Clone, Default)]
pub struct MarkerFilter {
    /// Effective family: the override when set, otherwise derived from hex.
    pub family: Option<ColorFamily>,
    pub brand_id: Option<String>,
    pub grid_id: Option<String>,
    pub storage_id: Option<String>,
    /// Substring of the number or color name.
    pub search: Option<String>,
    pub limit: Option<u32>,
}

impl SwatchService {
    /// Create a marker in the requested storage.
    ///
    /// # Errors
    ///
    /// A validation error for a blank number/name or malformed hex,
    /// `InvalidState` for a duplicate number, and any `Placement` error from
    /// resolving the target.
    pub async fn create_marker(
        &self,
        actor: &Actor,
        new: NewMarker,
    ) -> Result<Marker, DatabaseError> {
        let number = required_name(&new.number, "Marker number")?;
        let color_name = required_name(&new.color_name, "Color name")?;
        let hex = normalize_hex(&new.hex).map_err(|e| DatabaseError::validation(e.to_string()))?;

        let snapshot = self.load_snapshot(actor).await?;
        if snapshot.find_marker_by_number(&number).is_some() {
            return Err(DatabaseError::InvalidState(format!(
                "Marker number \"{number}\" already exists"
            )));
        }
        let storage = resolve_placement(&new.placement, actor, None, &snapshot)?;

        let brand_id = match &new.brand {
            Some(brand) => Some(self.resolve_brand(actor, brand).await?.0.id),
            None => None,
        };

        let now = Utc::now();
        let marker = Marker {
            id: self.db().generate_id(PREFIX_MARKER).await?,
            owner_id: actor.id.clone(),
            number,
            color_name,
            hex,
            brand_id,
            family_override: new.family_override,
            storage,
            notes: new.notes.filter(|n| !n.trim().is_empty()),
            created_at: now,
            updated_at: now,
        };
        self.insert_marker(&marker).await?;

        self.record(
            Some(actor),
            EntityType::Marker,
            &marker.id,
            AuditAction::Created,
            Some(json!({ "number": marker.number, "storage": marker.storage })),
        )
        .await?;

        Ok(marker)
    }

    pub(crate) async fn insert_marker(&self, marker: &Marker) -> Result<(), DatabaseError> {
        let [grid_id, column, row, storage_id] = storage_columns(&marker.storage);
        let result = self
            .db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO markers ({MARKER_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)"
                ),
                libsql::params![
                    marker.id.as_str(),
                    marker.owner_id.as_str(),
                    marker.number.as_str(),
                    marker.color_name.as_str(),
                    marker.hex.as_str(),
                    marker.brand_id.as_deref(),
                    marker.family_override.map(ColorFamily::as_str),
                    grid_id,
                    column,
                    row,
                    storage_id,
                    marker.notes.as_deref(),
                    marker.created_at.to_rfc3339(),
                    marker.updated_at.to_rfc3339()
                ],
            )
            .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) => Err(self.write_error(e, &marker.number, &marker.storage).await),
        }
    }

    /// Translate a failed marker write into a domain error.
    pub(crate) async fn write_error(
        &self,
        e: libsql::Error,
        number: &str,
        storage: &MarkerStorage,
    ) -> DatabaseError {
        match storage.grid_position() {
            Some((_, column, row)) if is_grid_cell_taken(&e) => {
                let occupant = match self.occupant_number(storage).await {
                    Ok(Some(number)) => number,
                    Ok(None) | Err(_) => "unknown".to_string(),
                };
                tracing::debug!(column, row, %occupant, "grid cell taken by concurrent write");
                PlacementError::Conflict {
                    column,
                    row,
                    occupant,
                }
                .into()
            }
            _ if is_duplicate_number(&e) => {
                DatabaseError::InvalidState(format!("Marker number \"{number}\" already exists"))
            }
            _ => e.into(),
        }
    }

    pub async fn get_marker(&self, actor: &Actor, id: &str) -> Result<Marker, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {MARKER_COLS} FROM markers WHERE id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Marker, id))?;
        let marker = row_to_marker(&row)?;
        if !actor.can_access(&marker.owner_id) {
            return Err(DatabaseError::not_found(EntityType::Marker, id));
        }
        Ok(marker)
    }

    /// The actor's own marker with this number.
    pub async fn get_marker_by_number(
        &self,
        actor: &Actor,
        number: &str,
    ) -> Result<Marker, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {MARKER_COLS} FROM markers WHERE owner_id = ?1 AND number = ?2"),
                libsql::params![actor.id.as_str(), number.trim()],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Marker, number))?;
        row_to_marker(&row)
    }

    /// Update everything except storage. Use [`Self::move_marker`] to relocate.
    ///
    /// # Errors
    ///
    /// A validation error for malformed hex or blank text, `NotFound` for an
    /// unknown brand ID, `InvalidState` when renumbering onto an existing
    /// number.
    pub async fn update_marker(
        &self,
        actor: &Actor,
        marker_id: &str,
        update: MarkerUpdate,
    ) -> Result<Marker, DatabaseError> {
        let marker = self.get_marker(actor, marker_id).await?;

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1;

        if let Some(ref number) = update.number {
            sets.push(format!("number = ?{idx}"));
            params.push(required_name(number, "Marker number")?.into());
            idx += 1;
        }
        if let Some(ref color_name) = update.color_name {
            sets.push(format!("color_name = ?{idx}"));
            params.push(required_name(color_name, "Color name")?.into());
            idx += 1;
        }
        if let Some(ref hex) = update.hex {
            sets.push(format!("hex = ?{idx}"));
            let hex = normalize_hex(hex).map_err(|e| DatabaseError::validation(e.to_string()))?;
            params.push(hex.into());
            idx += 1;
        }
        if let Some(ref brand) = update.brand {
            let brand_id = match brand {
                Some(brand) => Some(self.resolve_brand(actor, brand).await?.0.id),
                None => None,
            };
            sets.push(format!("brand_id = ?{idx}"));
            params.push(brand_id.into());
            idx += 1;
        }
        if let Some(family) = update.family_override {
            sets.push(format!("family_override = ?{idx}"));
            params.push(family.map(ColorFamily::as_str).into());
            idx += 1;
        }
        if let Some(ref notes) = update.notes {
            sets.push(format!("notes = ?{idx}"));
            params.push(notes.as_deref().into());
            idx += 1;
        }

        if sets.is_empty() {
            return Ok(marker);
        }

        sets.push(format!("updated_at = ?{idx}"));
        params.push(Utc::now().to_rfc3339().into());
        idx += 1;

        params.push(marker_id.into());
        let sql = format!("UPDATE markers SET {} WHERE id = ?{idx}", sets.join(", "));
        if let Err(e) = self
            .db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await
        {
            let number = update.number.as_deref().unwrap_or(&marker.number);
            return Err(self.write_error(e, number, &marker.storage).await);
        }

        self.record(
            Some(actor),
            EntityType::Marker,
            marker_id,
            AuditAction::Updated,
            Some(to_detail(&update)?),
        )
        .await?;

        self.get_marker(actor, marker_id).await
    }

    /// Move a marker to a grid cell or simple storage.
    ///
    /// Re-validating the marker's own cell succeeds and changes nothing.
    ///
    /// # Errors
    ///
    /// Any `Placement` error from resolving the target.
    pub async fn move_marker(
        &self,
        actor: &Actor,
        marker_id: &str,
        request: &PlacementRequest,
    ) -> Result<Marker, DatabaseError> {
        let marker = self.get_marker(actor, marker_id).await?;
        let snapshot = self.load_snapshot(actor).await?;
        let storage = resolve_placement(request, actor, Some(&marker.id), &snapshot)?;
        if storage == marker.storage {
            return Ok(marker);
        }

        self.write_storage(&marker, &storage).await?;

        self.record(
            Some(actor),
            EntityType::Marker,
            marker_id,
            AuditAction::Moved,
            Some(json!({ "from": marker.storage, "to": storage })),
        )
        .await?;

        self.get_marker(actor, marker_id).await
    }

    /// Point a marker at `storage` without re-running placement checks.
    ///
    /// The grid-cell index still rejects a taken cell; that surfaces as
    /// `Placement(Conflict)`.
    pub(crate) async fn write_storage(
        &self,
        marker: &Marker,
        storage: &MarkerStorage,
    ) -> Result<(), DatabaseError> {
        let [grid_id, column, row, storage_id] = storage_columns(storage);
        let result = self
            .db()
            .conn()
            .execute(
                "UPDATE markers
                 SET grid_id = ?1, column_number = ?2, row_number = ?3, simple_storage_id = ?4, updated_at = ?5
                 WHERE id = ?6",
                libsql::params![
                    grid_id,
                    column,
                    row,
                    storage_id,
                    Utc::now().to_rfc3339(),
                    marker.id.as_str()
                ],
            )
            .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) => Err(self.write_error(e, &marker.number, storage).await),
        }
    }

    pub async fn delete_marker(&self, actor: &Actor, marker_id: &str) -> Result<(), DatabaseError> {
        let marker = self.get_marker(actor, marker_id).await?;
        self.db()
            .conn()
            .execute("DELETE FROM markers WHERE id = ?1", [marker_id])
            .await?;

        self.record(
            Some(actor),
            EntityType::Marker,
            marker_id,
            AuditAction::Deleted,
            Some(json!({ "number": marker.number })),
        )
        .await
    }

    /// List the actor's markers (all markers for admins), ordered by number.
    pub async fn list_markers(
        &self,
        actor: &Actor,
        filter: &MarkerFilter,
    ) -> Result<Vec<Marker>, DatabaseError> {
        let (owner_clause, mut params) = owner_filter(actor, "owner_id", 1);
        let mut conditions = vec![owner_clause];

        if let Some(ref brand_id) = filter.brand_id {
            params.push(libsql::Value::Text(brand_id.clone()));
            conditions.push(format!("AND brand_id = ?{}", params.len()));
        }
        if let Some(ref grid_id) = filter.grid_id {
            params.push(libsql::Value::Text(grid_id.clone()));
            conditions.push(format!("AND grid_id = ?{}", params.len()));
        }
        if let Some(ref storage_id) = filter.storage_id {
            params.push(libsql::Value::Text(storage_id.clone()));
            conditions.push(format!("AND simple_storage_id = ?{}", params.len()));
        }
        if let Some(ref search) = filter.search {
            params.push(libsql::Value::Text(format!("%{}%", search.trim())));
            let n = params.len();
            conditions.push(format!("AND (number LIKE ?{n} OR color_name LIKE ?{n})"));
        }

        let limit = filter.limit.unwrap_or(100);
        // Family is derived in Rust, so the SQL limit only applies without it.
        let sql_limit = if filter.family.is_some() {
            String::new()
        } else {
            format!("LIMIT {limit}")
        };
        let sql = format!(
            "SELECT {MARKER_COLS} FROM markers WHERE 1=1 {} ORDER BY number {sql_limit}",
            conditions.join(" ")
        );

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let max = usize::try_from(limit).unwrap_or(usize::MAX);
        let mut markers = Vec::new();
        while let Some(row) = rows.next().await? {
            if markers.len() >= max {
                break;
            }
            let marker = row_to_marker(&row)?;
            if filter.family.is_none_or(|family| in_family(&marker, family)) {
                markers.push(marker);
            }
        }
        Ok(markers)
    }

    /// A random marker, optionally restricted to one effective family.
    pub async fn random_marker(
        &self,
        actor: &Actor,
        family: Option<ColorFamily>,
    ) -> Result<Option<Marker>, DatabaseError> {
        let candidates = self
            .list_markers(
                actor,
                &MarkerFilter {
                    family,
                    limit: Some(u32::MAX),
                    ..MarkerFilter::default()
                },
            )
            .await?;
        if candidates.is_empty() {
            return Ok(None);
        }
        let idx = random_index(candidates.len())?;
        Ok(candidates.into_iter().nth(idx))
    }

    pub(crate) async fn markers_in_grid(&self, grid_id: &str) -> Result<Vec<Marker>, DatabaseError> {
        self.markers_where("grid_id", grid_id).await
    }

    pub(crate) async fn markers_in_storage(
        &self,
        storage_id: &str,
    ) -> Result<Vec<Marker>, DatabaseError> {
        self.markers_where("simple_storage_id", storage_id).await
    }

    async fn markers_where(&self, column: &str, value: &str) -> Result<Vec<Marker>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {MARKER_COLS} FROM markers WHERE {column} = ?1 ORDER BY number"),
                [value],
            )
            .await?;
        let mut markers = Vec::new();
        while let Some(row) = rows.next().await? {
            markers.push(row_to_marker(&row)?);
        }
        Ok(markers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{admin_and_user, service_with_owner, test_service};
    use crate::updates::marker::MarkerUpdateBuilder;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use swatch_core::placement::PlacementErrorKind;

    async fn rack(svc: &SwatchService, owner: &Actor) -> String {
        svc.create_grid(owner, "Rack", 4, 3).await.unwrap().id
    }

    #[tokio::test]
    async fn create_in_grid_and_simple_storage() {
        let (svc, owner) = service_with_owner().await;
        let grid_id = rack(&svc, &owner).await;
        let cup = svc.create_storage(&owner, "Cup", None).await.unwrap();

        let red = svc
            .create_marker(
                &owner,
                NewMarker::new("R27", "Cadmium Red", "e30022", PlacementRequest::grid("rack", 2, 3))
                    .brand(BrandRef::ByName("Copic".into())),
            )
            .await
            .unwrap();
        assert!(red.id.starts_with("mkr-"));
        assert_eq!(red.hex, "#E30022");
        assert!(red.brand_id.is_some());
        assert_eq!(
            red.storage,
            MarkerStorage::Grid {
                grid_id: grid_id.clone(),
                column: 2,
                row: 3
            }
        );

        let sky = svc
            .create_marker(
                &owner,
                NewMarker::new("B01", "Sky", "#87CEEB", PlacementRequest::simple(&cup.id)),
            )
            .await
            .unwrap();
        assert_eq!(svc.get_marker(&owner, &sky.id).await.unwrap(), sky);
        assert_eq!(svc.storage_contents(&owner, &cup.id).await.unwrap().len(), 1);
        assert_eq!(svc.get_marker_by_number(&owner, "R27").await.unwrap().id, red.id);
    }

    #[tokio::test]
    async fn occupied_cell_is_a_conflict() {
        let (svc, owner) = service_with_owner().await;
        let grid_id = rack(&svc, &owner).await;
        svc.create_marker(
            &owner,
            NewMarker::new("A", "Red", "#FF0000", PlacementRequest::grid(&grid_id, 1, 1)),
        )
        .await
        .unwrap();

        let err = svc
            .create_marker(
                &owner,
                NewMarker::new("B", "Blue", "#0000FF", PlacementRequest::grid(&grid_id, 1, 1)),
            )
            .await
            .unwrap_err();
        match err {
            DatabaseError::Placement(err) => {
                assert_eq!(err.kind(), PlacementErrorKind::Conflict);
                assert_eq!(
                    err.to_string(),
                    "Position (1, 1) is already occupied by marker \"A\""
                );
            }
            other => panic!("unexpected {other}"),
        }
    }

    #[rstest]
    #[case::column_zero(0, 1)]
    #[case::past_last_column(5, 1)]
    #[case::row_zero(1, 0)]
    #[case::past_last_row(1, 4)]
    #[tokio::test]
    async fn out_of_bounds_cells_are_rejected(#[case] column: u32, #[case] row: u32) {
        let (svc, owner) = service_with_owner().await;
        let grid_id = rack(&svc, &owner).await;

        let err = svc
            .create_marker(
                &owner,
                NewMarker::new("A", "Red", "#FF0000", PlacementRequest::grid(&grid_id, column, row)),
            )
            .await
            .unwrap_err();
        assert!(
            matches!(
                err,
                DatabaseError::Placement(PlacementError::OutOfBounds { .. })
            ),
            "{err}"
        );
    }

    #[rstest]
    #[case::corner(1, 1)]
    #[case::far_corner(4, 3)]
    #[tokio::test]
    async fn edge_cells_are_accepted(#[case] column: u32, #[case] row: u32) {
        let (svc, owner) = service_with_owner().await;
        let grid_id = rack(&svc, &owner).await;

        let marker = svc
            .create_marker(
                &owner,
                NewMarker::new("A", "Red", "#FF0000", PlacementRequest::grid(&grid_id, column, row)),
            )
            .await
            .unwrap();
        assert_eq!(marker.storage.grid_position(), Some((grid_id.as_str(), column, row)));
    }

    #[tokio::test]
    async fn malformed_hex_is_rejected() {
        let (svc, owner) = service_with_owner().await;
        let grid_id = rack(&svc, &owner).await;

        let err = svc
            .create_marker(
                &owner,
                NewMarker::new("A", "Red", "#F00", PlacementRequest::grid(&grid_id, 1, 1)),
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Malformed hex"), "{err}");
    }

    #[tokio::test]
    async fn the_grid_cell_index_backs_up_validation() {
        let (svc, owner) = service_with_owner().await;
        let grid_id = rack(&svc, &owner).await;
        let first = svc
            .create_marker(
                &owner,
                NewMarker::new("A", "Red", "#FF0000", PlacementRequest::grid(&grid_id, 3, 3)),
            )
            .await
            .unwrap();

        // A writer that validated before `first` landed.
        let stale = Marker {
            id: "mkr-0000beef".into(),
            number: "B".into(),
            ..first
        };
        let err = svc.insert_marker(&stale).await.unwrap_err();
        assert!(
            matches!(
                &err,
                DatabaseError::Placement(PlacementError::Conflict { occupant, .. }) if occupant == "A"
            ),
            "{err}"
        );
    }

    #[tokio::test]
    async fn the_grid_cell_index_backs_up_moves() {
        let (svc, owner) = service_with_owner().await;
        let grid_id = rack(&svc, &owner).await;
        svc.create_storage(&owner, "Cup", None).await.unwrap();
        let first = svc
            .create_marker(
                &owner,
                NewMarker::new("A", "Red", "#FF0000", PlacementRequest::grid(&grid_id, 3, 3)),
            )
            .await
            .unwrap();
        let second = svc
            .create_marker(
                &owner,
                NewMarker::new("B", "Blue", "#0000FF", PlacementRequest::simple("Cup")),
            )
            .await
            .unwrap();

        // A move that validated before `first` landed.
        let err = svc
            .write_storage(&second, &first.storage)
            .await
            .unwrap_err();
        assert!(
            matches!(
                &err,
                DatabaseError::Placement(PlacementError::Conflict { occupant, .. }) if occupant == "A"
            ),
            "{err}"
        );
        let unchanged = svc.get_marker(&owner, &second.id).await.unwrap();
        assert_eq!(unchanged.storage, second.storage);
    }

    #[tokio::test]
    async fn move_between_modes() {
        let (svc, owner) = service_with_owner().await;
        let grid_id = rack(&svc, &owner).await;
        let cup = svc.create_storage(&owner, "Cup", None).await.unwrap();
        let marker = svc
            .create_marker(
                &owner,
                NewMarker::new("A", "Red", "#FF0000", PlacementRequest::grid(&grid_id, 1, 1)),
            )
            .await
            .unwrap();

        let same = svc
            .move_marker(&owner, &marker.id, &PlacementRequest::grid(&grid_id, 1, 1))
            .await
            .unwrap();
        assert_eq!(same.storage, marker.storage);

        let moved = svc
            .move_marker(&owner, &marker.id, &PlacementRequest::simple("cup"))
            .await
            .unwrap();
        assert_eq!(
            moved.storage,
            MarkerStorage::Simple {
                storage_id: cup.id.clone()
            }
        );

        let back = svc
            .move_marker(&owner, &marker.id, &PlacementRequest::grid("Rack", 4, 3))
            .await
            .unwrap();
        assert_eq!(back.storage.grid_position(), Some((grid_id.as_str(), 4, 3)));
    }

    #[tokio::test]
    async fn update_fields_and_override() {
        let (svc, owner) = service_with_owner().await;
        let cup = svc.create_storage(&owner, "Cup", None).await.unwrap();
        let marker = svc
            .create_marker(
                &owner,
                NewMarker::new("A", "Bark", "#8B4513", PlacementRequest::simple(&cup.id)),
            )
            .await
            .unwrap();
        assert_eq!(marker.effective_family(), ColorFamily::Brown);

        let update = MarkerUpdateBuilder::new()
            .color_name("Sunset")
            .family_override(Some(ColorFamily::Orange))
            .notes(Some("Favorite".into()))
            .build();
        let updated = svc.update_marker(&owner, &marker.id, update).await.unwrap();
        assert_eq!(updated.color_name, "Sunset");
        assert_eq!(updated.effective_family(), ColorFamily::Orange);
        assert_eq!(updated.notes.as_deref(), Some("Favorite"));
    }

    #[tokio::test]
    async fn renumbering_onto_existing_number_fails() {
        let (svc, owner) = service_with_owner().await;
        let cup = svc.create_storage(&owner, "Cup", None).await.unwrap();
        for number in ["A", "B"] {
            svc.create_marker(
                &owner,
                NewMarker::new(number, "Red", "#FF0000", PlacementRequest::simple(&cup.id)),
            )
            .await
            .unwrap();
        }
        let b = svc.get_marker_by_number(&owner, "B").await.unwrap();

        let err = svc
            .update_marker(&owner, &b.id, MarkerUpdateBuilder::new().number("A").build())
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidState(_)), "{err}");
    }

    #[tokio::test]
    async fn family_filter_uses_override_and_brown_precedence() {
        let (svc, owner) = service_with_owner().await;
        let cup = svc.create_storage(&owner, "Cup", None).await.unwrap();
        let add = |number: &'static str, hex: &'static str| {
            NewMarker::new(number, number, hex, PlacementRequest::simple(cup.id.clone()))
        };
        svc.create_marker(&owner, add("bark", "#8B4513")).await.unwrap();
        svc.create_marker(&owner, add("pumpkin", "#FF8C00")).await.unwrap();
        svc.create_marker(
            &owner,
            add("forced", "#0000FF").family_override(ColorFamily::Orange),
        )
        .await
        .unwrap();

        let orange = svc
            .list_markers(
                &owner,
                &MarkerFilter {
                    family: Some(ColorFamily::Orange),
                    ..MarkerFilter::default()
                },
            )
            .await
            .unwrap();
        let numbers: Vec<&str> = orange.iter().map(|m| m.number.as_str()).collect();
        assert_eq!(numbers, vec!["forced", "pumpkin"]);

        let brown = svc
            .random_marker(&owner, Some(ColorFamily::Brown))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(brown.number, "bark");
        assert!(svc
            .random_marker(&owner, Some(ColorFamily::Green))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn search_and_visibility() {
        let svc = test_service().await;
        let (admin, user) = admin_and_user(&svc).await;
        let cup = svc.create_storage(&user, "Cup", None).await.unwrap();
        let marker = svc
            .create_marker(
                &user,
                NewMarker::new("R27", "Cadmium Red", "#E30022", PlacementRequest::simple(&cup.id)),
            )
            .await
            .unwrap();

        let found = svc
            .list_markers(
                &user,
                &MarkerFilter {
                    search: Some("cadmium".into()),
                    ..MarkerFilter::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(found.len(), 1);

        let stranger = Actor::from(&svc.create_user(Some(&admin), "eve", false).await.unwrap());
        assert!(svc.get_marker(&stranger, &marker.id).await.unwrap_err().is_not_found());
        assert!(svc
            .list_markers(&stranger, &MarkerFilter::default())
            .await
            .unwrap()
            .is_empty());
        assert!(svc.get_marker(&admin, &marker.id).await.is_ok());
    }
}
