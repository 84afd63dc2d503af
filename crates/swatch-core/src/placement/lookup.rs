use std::collections::{HashMap, HashSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Grid, Marker, MarkerStorage, SimpleStorage};

/// Outcome of resolving a container by ID or name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<T> {
    Found(T),
    Missing,
    /// The name matched this many containers.
    Ambiguous(usize),
}

/// The part of a marker placement rules care about.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MarkerSlot {
    pub id: String,
    pub owner_id: String,
    pub number: String,
    pub storage: MarkerStorage,
}

impl From<&Marker> for MarkerSlot {
    fn from(marker: &Marker) -> Self {
        Self {
            id: marker.id.clone(),
            owner_id: marker.owner_id.clone(),
            number: marker.number.clone(),
            storage: marker.storage.clone(),
        }
    }
}

/// Read-only view of persisted inventory consumed by the placement rules.
pub trait PlacementLookup {
    /// Resolve a grid by exact ID, else by case-insensitive name.
    fn find_grid(&self, id_or_name: &str) -> Resolution<&Grid>;

    /// Resolve a simple storage by exact ID, else by case-insensitive name.
    fn find_storage(&self, id_or_name: &str) -> Resolution<&SimpleStorage>;

    /// The marker occupying a cell, ignoring `exclude_id`.
    fn find_marker_at(
        &self,
        grid_id: &str,
        column: u32,
        row: u32,
        exclude_id: Option<&str>,
    ) -> Option<&MarkerSlot>;

    /// The acting owner's marker with this number.
    fn find_marker_by_number(&self, number: &str) -> Option<&MarkerSlot>;

    /// Whether a brand with this exact ID exists.
    fn has_brand(&self, brand_id: &str) -> bool;
}

/// In-memory [`PlacementLookup`] over rows loaded by `swatch-db`.
///
/// Scoped to one owner: number lookups only see `owner_id`'s markers, while
/// position lookups see every marker in the loaded grids.
#[derive(Debug, Clone, Default)]
pub struct InventorySnapshot {
    owner_id: String,
    grids: Vec<Grid>,
    storages: Vec<SimpleStorage>,
    markers: Vec<MarkerSlot>,
    brand_ids: HashSet<String>,
    by_position: HashMap<(String, u32, u32), usize>,
    by_number: HashMap<String, usize>,
}

impl InventorySnapshot {
    #[must_use]
    pub fn new(
        owner_id: impl Into<String>,
        grids: Vec<Grid>,
        storages: Vec<SimpleStorage>,
        markers: Vec<MarkerSlot>,
    ) -> Self {
        let owner_id = owner_id.into();
        let mut by_position = HashMap::new();
        let mut by_number = HashMap::new();

        for (idx, slot) in markers.iter().enumerate() {
            if let Some((grid_id, column, row)) = slot.storage.grid_position() {
                by_position.insert((grid_id.to_string(), column, row), idx);
            }
            if slot.owner_id == owner_id {
                by_number.insert(slot.number.clone(), idx);
            }
        }

        Self {
            owner_id,
            grids,
            storages,
            markers,
            brand_ids: HashSet::new(),
            by_position,
            by_number,
        }
    }

    /// Known brand IDs. Brands are shared across owners.
    #[must_use]
    pub fn with_brands<I, S>(mut self, brand_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.brand_ids.extend(brand_ids.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    #[must_use]
    pub fn markers(&self) -> &[MarkerSlot] {
        &self.markers
    }

    #[must_use]
    pub fn grids(&self) -> &[Grid] {
        &self.grids
    }
}

fn resolve<'a, T>(
    items: &'a [T],
    id_or_name: &str,
    id: impl Fn(&T) -> &str,
    name: impl Fn(&T) -> &str,
) -> Resolution<&'a T> {
    if let Some(item) = items.iter().find(|item| id(item) == id_or_name) {
        return Resolution::Found(item);
    }

    let wanted = id_or_name.trim().to_lowercase();
    let mut matches = items
        .iter()
        .filter(|item| name(item).to_lowercase() == wanted);
    match (matches.next(), matches.count()) {
        (None, _) => Resolution::Missing,
        (Some(item), 0) => Resolution::Found(item),
        (Some(_), rest) => Resolution::Ambiguous(rest + 1),
    }
}

impl PlacementLookup for InventorySnapshot {
    fn find_grid(&self, id_or_name: &str) -> Resolution<&Grid> {
        resolve(
            self.grids.as_slice(),
            id_or_name,
            |g| g.id.as_str(),
            |g| g.name.as_str(),
        )
    }

    fn find_storage(&self, id_or_name: &str) -> Resolution<&SimpleStorage> {
        resolve(
            self.storages.as_slice(),
            id_or_name,
            |s| s.id.as_str(),
            |s| s.name.as_str(),
        )
    }

    fn find_marker_at(
        &self,
        grid_id: &str,
        column: u32,
        row: u32,
        exclude_id: Option<&str>,
    ) -> Option<&MarkerSlot> {
        let idx = self
            .by_position
            .get(&(grid_id.to_string(), column, row))?;
        let slot = &self.markers[*idx];
        (exclude_id != Some(slot.id.as_str())).then_some(slot)
    }

    fn find_marker_by_number(&self, number: &str) -> Option<&MarkerSlot> {
        self.by_number.get(number).map(|idx| &self.markers[*idx])
    }

    fn has_brand(&self, brand_id: &str) -> bool {
        self.brand_ids.contains(brand_id)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_fixtures::*;
    use super::*;

    #[test]
    fn id_match_beats_name_match() {
        let snapshot = InventorySnapshot::new(
            OWNER,
            vec![
                grid("grd-00000001", "grd-00000002", 2, 2),
                grid("grd-00000002", "Second", 2, 2),
            ],
            vec![],
            vec![],
        );
        match snapshot.find_grid("grd-00000002") {
            Resolution::Found(g) => assert_eq!(g.name, "Second"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn number_lookup_is_scoped_to_owner() {
        let mut foreign = slot_at("mkr-00000002", "X1", "grd-00000001", 1, 2);
        foreign.owner_id = "usr-00000009".into();
        let snapshot = InventorySnapshot::new(
            OWNER,
            vec![grid("grd-00000001", "Rack", 2, 2)],
            vec![],
            vec![slot_at("mkr-00000001", "A1", "grd-00000001", 1, 1), foreign],
        );

        assert!(snapshot.find_marker_by_number("A1").is_some());
        assert!(snapshot.find_marker_by_number("X1").is_none());
        assert_eq!(
            snapshot
                .find_marker_at("grd-00000001", 1, 2, None)
                .map(|s| s.number.as_str()),
            Some("X1")
        );
    }

    #[test]
    fn brand_ids_match_exactly() {
        let snapshot = InventorySnapshot::default().with_brands(["brd-0a1b2c3d"]);
        assert!(snapshot.has_brand("brd-0a1b2c3d"));
        assert!(!snapshot.has_brand("BRD-0A1B2C3D"));
    }

    #[test]
    fn missing_name_resolves_to_missing() {
        let snapshot = InventorySnapshot::default();
        assert_eq!(snapshot.find_storage("Cup"), Resolution::Missing);
    }
}
