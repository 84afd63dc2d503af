use crate::cli::GlobalFlags;
use crate::cli::subcommands::PlacementArgs;
use crate::commands::shared::lookup;
use crate::commands::shared::placement::placement_request;
use crate::context::AppContext;
use crate::output::output;

/// Handle `swt marker move`.
pub async fn run(
    reference: &str,
    placement: &PlacementArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let actor = ctx.actor()?;
    let request = placement_request(placement)?;
    let marker = lookup::marker(ctx, actor, reference).await?;
    let moved = ctx.service.move_marker(actor, &marker.id, &request).await?;
    output(&moved, flags.format)
}
