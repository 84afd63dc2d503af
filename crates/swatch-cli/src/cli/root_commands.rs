use clap::{Args, Subcommand};

use crate::cli::subcommands::{
    BrandCommands, ColorCommands, GridCommands, MarkerCommands, PageCommands, StorageCommands,
    UserCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Users.
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Grid storage (racks, trays, drawers with cells).
    Grid {
        #[command(subcommand)]
        action: GridCommands,
    },
    /// Simple storage (cups, boxes, bins).
    Storage {
        #[command(subcommand)]
        action: StorageCommands,
    },
    /// Brands.
    Brand {
        #[command(subcommand)]
        action: BrandCommands,
    },
    /// Markers.
    Marker {
        #[command(subcommand)]
        action: MarkerCommands,
    },
    /// Color pages.
    Page {
        #[command(subcommand)]
        action: PageCommands,
    },
    /// Color classification.
    Color {
        #[command(subcommand)]
        action: ColorCommands,
    },
    /// Bulk import markers from a delimited file.
    Import(ImportArgs),
    /// View audit trail.
    Audit(AuditArgs),
}

/// Arguments for `swt import`.
#[derive(Clone, Debug, Args)]
pub struct ImportArgs {
    /// File to import, or `-` for stdin.
    pub file: String,
    /// Field delimiter (single character or `tab`).
    #[arg(long)]
    pub delimiter: Option<String>,
    /// The first line is a header.
    #[arg(long)]
    pub header: bool,
    /// Validate and print the plan without writing.
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for `swt audit`.
#[derive(Clone, Debug, Args)]
pub struct AuditArgs {
    #[arg(long)]
    pub entity_type: Option<String>,
    #[arg(long)]
    pub entity_id: Option<String>,
    #[arg(long)]
    pub action: Option<String>,
    /// Only entries by this username.
    #[arg(long)]
    pub actor: Option<String>,
}
