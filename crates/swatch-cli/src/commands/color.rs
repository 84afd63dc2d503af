use serde::Serialize;
use swatch_core::color::family_matches;
use swatch_core::enums::ColorFamily;
use swatch_core::responses::ClassifyResponse;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ColorCommands;
use crate::commands::shared::parse::parse_enum;
use crate::output::output;

#[derive(Debug, Serialize)]
struct FamilyCheck {
    #[serde(flatten)]
    classification: ClassifyResponse,
    checked_family: ColorFamily,
    belongs: bool,
}

#[derive(Debug, Serialize)]
struct FamilyEntry {
    family: ColorFamily,
    grayscale: bool,
}

/// Handle `swt color`. Runs without a database.
pub fn handle(action: &ColorCommands, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        ColorCommands::Classify { hex, family: None } => {
            output(&ClassifyResponse::for_hex(hex.trim()), flags.format)
        }
        ColorCommands::Classify {
            hex,
            family: Some(family),
        } => {
            let family = parse_enum::<ColorFamily>(family, "family")?;
            let hex = hex.trim();
            output(
                &FamilyCheck {
                    classification: ClassifyResponse::for_hex(hex),
                    checked_family: family,
                    belongs: family_matches(hex, family),
                },
                flags.format,
            )
        }
        ColorCommands::Families => {
            let families = ColorFamily::ALL
                .iter()
                .map(|&family| FamilyEntry {
                    family,
                    grayscale: family.is_grayscale(),
                })
                .collect::<Vec<_>>();
            output(&families, flags.format)
        }
    }
}
