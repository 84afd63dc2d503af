use swatch_core::enums::ColorFamily;
use swatch_db::repos::marker::MarkerFilter;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::MarkerListArgs;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `swt marker list`.
pub async fn run(args: &MarkerListArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let actor = ctx.actor()?;

    let grid_id = match args.grid.as_deref() {
        Some(grid) => Some(ctx.service.find_grid(actor, grid).await?.id),
        None => None,
    };
    let storage_id = match args.storage.as_deref() {
        Some(storage) => Some(ctx.service.find_storage(actor, storage).await?.id),
        None => None,
    };

    let filter = MarkerFilter {
        family: args
            .family
            .as_deref()
            .map(|value| parse_enum::<ColorFamily>(value, "family"))
            .transpose()?,
        brand_id: args.brand.clone(),
        grid_id,
        storage_id,
        search: args.search.clone(),
        limit: Some(ctx.limit(args.limit, flags)),
    };

    let markers = ctx.service.list_markers(actor, &filter).await?;
    output(&markers, flags.format)
}
