use swatch_core::entities::BrandRef;
use swatch_core::enums::ColorFamily;
use swatch_db::updates::marker::MarkerUpdateBuilder;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::MarkerUpdateArgs;
use crate::commands::shared::lookup;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `swt marker update`.
pub async fn run(args: &MarkerUpdateArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let actor = ctx.actor()?;
    let marker = lookup::marker(ctx, actor, &args.marker).await?;

    let mut builder = MarkerUpdateBuilder::new();
    if let Some(number) = &args.number {
        builder = builder.number(number);
    }
    if let Some(name) = &args.name {
        builder = builder.color_name(name);
    }
    if let Some(hex) = &args.hex {
        builder = builder.hex(hex.trim());
    }
    if let Some(brand) = args.brand.as_deref() {
        builder = builder.brand(BrandRef::parse(brand));
    } else if args.clear_brand {
        builder = builder.brand(None);
    }
    if let Some(family) = args.family.as_deref() {
        builder = builder.family_override(Some(parse_enum::<ColorFamily>(family, "family")?));
    } else if args.clear_family {
        builder = builder.family_override(None);
    }
    if let Some(notes) = &args.notes {
        builder = builder.notes(Some(notes.clone()));
    } else if args.clear_notes {
        builder = builder.notes(None);
    }

    let updated = ctx
        .service
        .update_marker(actor, &marker.id, builder.build())
        .await?;
    output(&updated, flags.format)
}
