use swatch_core::entities::BrandRef;
use swatch_core::enums::ColorFamily;
use swatch_db::repos::marker::NewMarker;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::MarkerAddArgs;
use crate::commands::shared::parse::parse_enum;
use crate::commands::shared::placement::placement_request;
use crate::context::AppContext;
use crate::output::output;

/// Handle `swt marker add`.
pub async fn run(args: &MarkerAddArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let actor = ctx.actor()?;
    let mut new = NewMarker::new(
        args.number.as_str(),
        args.name.as_str(),
        args.hex.trim(),
        placement_request(&args.placement)?,
    );
    if let Some(brand) = args.brand.as_deref().and_then(BrandRef::parse) {
        new = new.brand(brand);
    }
    if let Some(family) = args.family.as_deref() {
        new = new.family_override(parse_enum::<ColorFamily>(family, "family")?);
    }
    if let Some(notes) = args.notes.as_deref() {
        new = new.notes(notes);
    }

    let marker = ctx.service.create_marker(actor, new).await?;
    output(&marker, flags.format)
}
