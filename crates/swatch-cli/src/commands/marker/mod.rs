mod add;
mod list;
mod r#move;
mod update;

use serde_json::json;
use swatch_core::enums::ColorFamily;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::MarkerCommands;
use crate::commands::shared::{lookup, parse::parse_enum};
use crate::context::AppContext;
use crate::output::output;

/// Handle `swt marker`.
pub async fn handle(action: &MarkerCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        MarkerCommands::Add(args) => add::run(args, ctx, flags).await,
        MarkerCommands::Get { marker } => {
            let actor = ctx.actor()?;
            output(&lookup::marker(ctx, actor, marker).await?, flags.format)
        }
        MarkerCommands::List(args) => list::run(args, ctx, flags).await,
        MarkerCommands::Update(args) => update::run(args, ctx, flags).await,
        MarkerCommands::Move { marker, placement } => {
            r#move::run(marker, placement, ctx, flags).await
        }
        MarkerCommands::Delete { marker } => {
            let actor = ctx.actor()?;
            let marker = lookup::marker(ctx, actor, marker).await?;
            ctx.service.delete_marker(actor, &marker.id).await?;
            output(&json!({ "deleted": marker.id, "number": marker.number }), flags.format)
        }
        MarkerCommands::Random { family } => {
            let actor = ctx.actor()?;
            let family = family
                .as_deref()
                .map(|value| parse_enum::<ColorFamily>(value, "family"))
                .transpose()?;
            match ctx.service.random_marker(actor, family).await? {
                Some(marker) => output(&marker, flags.format),
                None => anyhow::bail!("no markers match"),
            }
        }
    }
}
