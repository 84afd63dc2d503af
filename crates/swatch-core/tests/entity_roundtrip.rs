//! Serde roundtrip and JsonSchema validation tests for entity and response types.

use chrono::Utc;
use schemars::schema_for;
use serde_json::json;
use swatch_core::entities::*;
use swatch_core::enums::*;
use swatch_core::placement::{ImportError, PlacementErrorKind, PlacementRequest};
use swatch_core::responses::*;

fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn sample_marker(storage: MarkerStorage) -> Marker {
    Marker {
        id: "mkr-5e6f7a8b".into(),
        owner_id: "usr-1a2b3c4d".into(),
        number: "R27".into(),
        color_name: "Cadmium Red".into(),
        hex: "#E30022".into(),
        brand_id: Some("brd-9c8d7e6f".into()),
        family_override: None,
        storage,
        notes: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn sample_grid() -> Grid {
    Grid {
        id: "grd-0f1e2d3c".into(),
        owner_id: "usr-1a2b3c4d".into(),
        name: "Top Rack".into(),
        columns: 12,
        rows: 6,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

roundtrip_and_validate!(
    user_roundtrip,
    User,
    User {
        id: "usr-1a2b3c4d".into(),
        username: "ada".into(),
        is_admin: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    brand_roundtrip,
    Brand,
    Brand {
        id: "brd-9c8d7e6f".into(),
        name: "Copic".into(),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(grid_roundtrip, Grid, sample_grid());

roundtrip_and_validate!(
    storage_roundtrip,
    SimpleStorage,
    SimpleStorage {
        id: "sto-4b3a2918".into(),
        owner_id: "usr-1a2b3c4d".into(),
        name: "Pencil Cup".into(),
        description: Some("On the left of the desk".into()),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    grid_marker_roundtrip,
    Marker,
    sample_marker(MarkerStorage::Grid {
        grid_id: "grd-0f1e2d3c".into(),
        column: 3,
        row: 2,
    })
);

roundtrip_and_validate!(
    simple_marker_roundtrip,
    Marker,
    Marker {
        family_override: Some(ColorFamily::Pink),
        notes: Some("Nearly dry".into()),
        ..sample_marker(MarkerStorage::Simple {
            storage_id: "sto-4b3a2918".into(),
        })
    }
);

roundtrip_and_validate!(
    page_roundtrip,
    ColorPage,
    ColorPage {
        id: "pag-77665544".into(),
        owner_id: "usr-1a2b3c4d".into(),
        name: "Autumn".into(),
        description: None,
        colors: vec![
            PageColor {
                position: 0,
                hex: "#8B4513".into(),
                label: Some("Bark".into()),
            },
            PageColor {
                position: 1,
                hex: "#FF8C00".into(),
                label: None,
            },
        ],
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    audit_roundtrip,
    AuditEntry,
    AuditEntry {
        id: "aud-01020304".into(),
        actor_id: Some("usr-1a2b3c4d".into()),
        entity_type: EntityType::Marker,
        entity_id: "mkr-5e6f7a8b".into(),
        action: AuditAction::Moved,
        detail: Some(json!({"from": {"mode": "simple"}, "to": {"mode": "grid"}})),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    brand_ref_roundtrip,
    BrandRef,
    BrandRef::ById("brd-9c8d7e6f".into())
);

roundtrip_and_validate!(
    placement_request_roundtrip,
    PlacementRequest,
    PlacementRequest::grid("Top Rack", 12, 6)
);

roundtrip_and_validate!(
    import_error_roundtrip,
    ImportError,
    ImportError {
        kind: PlacementErrorKind::Conflict,
        problems: vec!["Position (1, 1) is already occupied by marker \"A\"".into()],
    }
);

roundtrip_and_validate!(
    import_summary_roundtrip,
    ImportSummary,
    ImportSummary {
        created: 40,
        updated: 2,
        moved: 1,
        brands_created: 3,
    }
);

roundtrip_and_validate!(
    classify_roundtrip,
    ClassifyResponse,
    ClassifyResponse::for_hex("#2E8B57")
);

roundtrip_and_validate!(
    grid_layout_roundtrip,
    GridLayout,
    GridLayout::new(
        sample_grid(),
        &[sample_marker(MarkerStorage::Grid {
            grid_id: "grd-0f1e2d3c".into(),
            column: 3,
            row: 2,
        })]
    )
);

#[test]
fn marker_storage_is_tagged_by_mode() {
    let marker = sample_marker(MarkerStorage::Simple {
        storage_id: "sto-4b3a2918".into(),
    });
    let value = serde_json::to_value(&marker).unwrap();
    assert_eq!(value["storage"]["mode"], "simple");
    assert_eq!(value["storage"]["storage_id"], "sto-4b3a2918");
}

#[test]
fn grid_layout_counts_free_cells() {
    let layout = GridLayout::new(
        sample_grid(),
        &[
            sample_marker(MarkerStorage::Grid {
                grid_id: "grd-0f1e2d3c".into(),
                column: 3,
                row: 2,
            }),
            sample_marker(MarkerStorage::Grid {
                grid_id: "grd-ffffffff".into(),
                column: 1,
                row: 1,
            }),
        ],
    );
    assert_eq!(layout.cells.len(), 1);
    assert_eq!(layout.free, 71);
    assert!(layout.cell(3, 2).is_some());
}
