use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `swt` binary.
#[derive(Debug, Parser)]
#[command(name = "swt", version, about = "Swatch - marker and art-supply inventory")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Max results to return
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Act as this user (overrides `general.user`)
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Database file (overrides `database.path`)
    #[arg(long, global = true)]
    pub db: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
            verbose: self.verbose,
            user: self.user.clone(),
            db: self.db.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::subcommands::{ColorCommands, GridCommands, MarkerCommands};
    use super::{Cli, Commands, GlobalFlags, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "swt", "--format", "table", "--limit", "10", "--verbose", "grid", "list",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.limit, Some(10));
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Grid {
                action: GridCommands::List
            }
        ));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["swt", "color", "classify", "#8B4513", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
        assert!(matches!(
            cli.command,
            Commands::Color {
                action: ColorCommands::Classify { .. }
            }
        ));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["swt", "--format", "xml", "grid", "list"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn marker_add_takes_grid_placement() {
        let cli = Cli::try_parse_from([
            "swt", "marker", "add", "R27", "Cadmium Red", "#E30022", "--grid", "Top Rack",
            "--col", "2", "--row", "3", "--brand", "Copic",
        ])
        .expect("cli should parse");

        let Commands::Marker {
            action: MarkerCommands::Add(args),
        } = cli.command
        else {
            panic!("expected marker add");
        };
        assert_eq!(args.number, "R27");
        assert_eq!(args.placement.grid.as_deref(), Some("Top Rack"));
        assert_eq!(args.placement.col, Some(2));
        assert_eq!(args.brand.as_deref(), Some("Copic"));
    }

    #[test]
    fn grid_and_storage_placement_conflict() {
        let parsed = Cli::try_parse_from([
            "swt", "marker", "move", "R27", "--grid", "Rack", "--col", "1", "--row", "1",
            "--storage", "Cup",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn global_flags_extraction_copies_values() {
        let cli = Cli::try_parse_from(["swt", "--user", "ada", "--db", "/tmp/s.db", "grid", "list"])
            .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.user.as_deref(), Some("ada"));
        assert_eq!(flags.db.as_deref(), Some("/tmp/s.db"));
    }
}
