use crate::cli::GlobalFlags;
use crate::cli::subcommands::UserCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `swt user`.
pub async fn handle(action: &UserCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        UserCommands::Create { username, admin } => {
            let user = ctx
                .service
                .create_user(ctx.actor_opt(), username, *admin)
                .await?;
            tracing::debug!(user = %user.username, admin = user.is_admin, "created user");
            output(&user, flags.format)
        }
        UserCommands::List => {
            let users = ctx.service.list_users(ctx.limit(None, flags)).await?;
            output(&users, flags.format)
        }
        UserCommands::Whoami => {
            let actor = ctx.actor()?;
            output(&ctx.service.get_user(&actor.id).await?, flags.format)
        }
    }
}
