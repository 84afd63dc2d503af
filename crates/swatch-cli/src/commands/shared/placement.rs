use anyhow::bail;
use swatch_core::placement::PlacementRequest;

use crate::cli::subcommands::PlacementArgs;

/// Turn `--grid/--col/--row` or `--storage` into a placement request.
pub fn placement_request(args: &PlacementArgs) -> anyhow::Result<PlacementRequest> {
    match (&args.grid, args.col, args.row, &args.storage) {
        (Some(grid), Some(column), Some(row), None) => {
            Ok(PlacementRequest::grid(grid.as_str(), column, row))
        }
        (None, None, None, Some(storage)) => Ok(PlacementRequest::simple(storage.as_str())),
        _ => bail!("give either --grid with --col and --row, or --storage"),
    }
}
