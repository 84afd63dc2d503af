use serde_json::json;
use swatch_db::updates::grid::GridUpdateBuilder;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::GridCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `swt grid`.
pub async fn handle(action: &GridCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let actor = ctx.actor()?;
    match action {
        GridCommands::Create { name, columns, rows } => {
            let grid = ctx.service.create_grid(actor, name, *columns, *rows).await?;
            output(&grid, flags.format)
        }
        GridCommands::List => {
            let grids = ctx.service.list_grids(actor, ctx.limit(None, flags)).await?;
            output(&grids, flags.format)
        }
        GridCommands::Show { grid } => {
            let grid = ctx.service.find_grid(actor, grid).await?;
            let layout = ctx.service.grid_occupancy(actor, &grid.id).await?;
            output(&layout, flags.format)
        }
        GridCommands::Update {
            grid,
            name,
            columns,
            rows,
        } => {
            let grid = ctx.service.find_grid(actor, grid).await?;
            let mut builder = GridUpdateBuilder::new();
            if let Some(name) = name {
                builder = builder.name(name);
            }
            if let Some(columns) = columns {
                builder = builder.columns(*columns);
            }
            if let Some(rows) = rows {
                builder = builder.rows(*rows);
            }
            let updated = ctx.service.update_grid(actor, &grid.id, builder.build()).await?;
            output(&updated, flags.format)
        }
        GridCommands::Delete { grid } => {
            let grid = ctx.service.find_grid(actor, grid).await?;
            ctx.service.delete_grid(actor, &grid.id).await?;
            output(&json!({ "deleted": grid.id, "name": grid.name }), flags.format)
        }
    }
}
