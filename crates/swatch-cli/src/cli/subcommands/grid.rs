use clap::Subcommand;

/// Grid storage commands. Grids are referenced by ID or name.
#[derive(Clone, Debug, Subcommand)]
pub enum GridCommands {
    /// Create a grid.
    Create {
        name: String,
        #[arg(long)]
        columns: u32,
        #[arg(long)]
        rows: u32,
    },
    /// List grids.
    List,
    /// Show a grid with its occupied cells.
    Show { grid: String },
    /// Rename or resize a grid.
    Update {
        grid: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        columns: Option<u32>,
        #[arg(long)]
        rows: Option<u32>,
    },
    /// Delete an empty grid.
    Delete { grid: String },
}
