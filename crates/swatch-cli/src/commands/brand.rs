use crate::cli::GlobalFlags;
use crate::cli::subcommands::BrandCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `swt brand`.
pub async fn handle(action: &BrandCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        BrandCommands::List => {
            let brands = ctx.service.list_brands(ctx.limit(None, flags)).await?;
            output(&brands, flags.format)
        }
        BrandCommands::Delete { id } => {
            ctx.service.delete_brand(ctx.actor()?, id).await?;
            output(&serde_json::json!({ "deleted": id }), flags.format)
        }
    }
}
