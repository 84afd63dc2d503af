use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::PageCommands;
use crate::commands::shared::parse::parse_page_color;
use crate::context::AppContext;
use crate::output::output;

/// Handle `swt page`.
pub async fn handle(action: &PageCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let actor = ctx.actor()?;
    match action {
        PageCommands::Create {
            name,
            description,
            colors,
        } => {
            let colors = colors.iter().map(|c| parse_page_color(c)).collect::<Vec<_>>();
            let page = ctx
                .service
                .create_page(actor, name, description.as_deref(), &colors)
                .await?;
            output(&page, flags.format)
        }
        PageCommands::Get { id } => output(&ctx.service.get_page(actor, id).await?, flags.format),
        PageCommands::List => {
            let pages = ctx.service.list_pages(actor, ctx.limit(None, flags)).await?;
            output(&pages, flags.format)
        }
        PageCommands::Rename { id, name } => {
            output(&ctx.service.rename_page(actor, id, name).await?, flags.format)
        }
        PageCommands::AddColor { id, color } => {
            let page = ctx
                .service
                .add_page_color(actor, id, &parse_page_color(color))
                .await?;
            output(&page, flags.format)
        }
        PageCommands::RemoveColor { id, position } => {
            let page = ctx.service.remove_page_color(actor, id, *position).await?;
            output(&page, flags.format)
        }
        PageCommands::Delete { id } => {
            ctx.service.delete_page(actor, id).await?;
            output(&json!({ "deleted": id }), flags.format)
        }
    }
}
