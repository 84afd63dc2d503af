use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::User { action } => commands::user::handle(&action, ctx, flags).await,
        Commands::Grid { action } => commands::grid::handle(&action, ctx, flags).await,
        Commands::Storage { action } => commands::storage::handle(&action, ctx, flags).await,
        Commands::Brand { action } => commands::brand::handle(&action, ctx, flags).await,
        Commands::Marker { action } => commands::marker::handle(&action, ctx, flags).await,
        Commands::Page { action } => commands::page::handle(&action, ctx, flags).await,
        Commands::Import(args) => commands::import::handle(&args, ctx, flags).await,
        Commands::Audit(args) => commands::audit::handle(&args, ctx, flags).await,
        Commands::Color { action } => commands::color::handle(&action, flags),
    }
}
