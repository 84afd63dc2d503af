use serde::de::DeserializeOwned;
use swatch_db::repos::page::NewPageColor;

/// Parse a snake_case enum value using serde-deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
    let json = format!("\"{normalized}\"");
    serde_json::from_str(&json).map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// Parse `HEX` or `HEX:label`. The hex itself is validated by the service.
pub fn parse_page_color(raw: &str) -> NewPageColor {
    match raw.split_once(':') {
        Some((hex, label)) => NewPageColor::new(hex.trim()).label(label.trim()),
        None => NewPageColor::new(raw.trim()),
    }
}

#[cfg(test)]
mod tests {
    use swatch_core::enums::{AuditAction, ColorFamily, EntityType};

    use super::{parse_enum, parse_page_color};

    #[test]
    fn parses_snake_case_enum() {
        let family: ColorFamily = parse_enum("Brown", "family").expect("family should parse");
        assert_eq!(family, ColorFamily::Brown);
        let action: AuditAction = parse_enum("moved", "action").expect("action should parse");
        assert_eq!(action, AuditAction::Moved);
    }

    #[test]
    fn parses_hyphenated_alias() {
        let entity: EntityType =
            parse_enum("simple-storage", "entity-type").expect("entity type should parse");
        assert_eq!(entity, EntityType::SimpleStorage);
    }

    #[test]
    fn errors_on_invalid_enum() {
        let err = parse_enum::<ColorFamily>("teal", "family").expect_err("should fail");
        assert!(err.to_string().contains("invalid family 'teal'"));
    }

    #[test]
    fn page_color_with_and_without_label() {
        let color = parse_page_color("#8B4513:Bark");
        assert_eq!(color.hex, "#8B4513");
        assert_eq!(color.label.as_deref(), Some("Bark"));
        assert_eq!(parse_page_color("ff8c00").label, None);
    }
}
