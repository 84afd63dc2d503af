use std::io::Read;

use anyhow::Context;
use swatch_config::parse_delimiter;
use swatch_core::import::{ImportOptions, parse_import};
use swatch_core::placement::plan_bulk_placement;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ImportArgs;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

/// Handle `swt import`.
pub async fn handle(args: &ImportArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let actor = ctx.actor()?;
    let text = read_input(&args.file)?;
    let options = options(args, ctx)?;

    let rows = parse_import(&text, &options).context("import file rejected")?;

    if args.dry_run {
        let snapshot = ctx.service.load_snapshot(actor).await?;
        let plan = plan_bulk_placement(&rows, actor, &snapshot).context("import rejected")?;
        return output(&plan, flags.format);
    }

    let progress = Progress::spinner(&format!("Placing {} rows", rows.len()));
    match ctx.service.bulk_place(actor, &rows).await {
        Ok(summary) => {
            progress.finish_clear();
            output(&summary, flags.format)
        }
        Err(error) => {
            progress.finish_err("import rejected; nothing was written");
            Err(error.into())
        }
    }
}

fn options(args: &ImportArgs, ctx: &AppContext) -> anyhow::Result<ImportOptions> {
    let mut options = ctx.config.import.options()?;
    if let Some(delimiter) = args.delimiter.as_deref() {
        options.delimiter = parse_delimiter(delimiter)?;
    }
    if args.header {
        options.has_header = true;
    }
    Ok(options)
}

fn read_input(file: &str) -> anyhow::Result<String> {
    if file == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read import from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(file).with_context(|| format!("failed to read import file '{file}'"))
}

#[cfg(test)]
mod tests {
    use super::read_input;

    #[test]
    fn reads_import_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("markers.csv");
        std::fs::write(&path, "R27,Red,#FF0000,,Cup\n").unwrap();
        let text = read_input(&path.to_string_lossy()).unwrap();
        assert!(text.starts_with("R27"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = read_input("/nonexistent/markers.csv").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/markers.csv"));
    }
}
