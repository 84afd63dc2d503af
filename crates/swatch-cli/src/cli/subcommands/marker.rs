use clap::{Args, Subcommand};

/// Where to put a marker: `--grid G --col C --row R` or `--storage S`.
#[derive(Clone, Debug, Args)]
pub struct PlacementArgs {
    /// Grid ID or name.
    #[arg(long, conflicts_with = "storage", requires = "col")]
    pub grid: Option<String>,
    /// 1-based column.
    #[arg(long, requires = "row")]
    pub col: Option<u32>,
    /// 1-based row.
    #[arg(long, requires = "grid")]
    pub row: Option<u32>,
    /// Simple storage ID or name.
    #[arg(long)]
    pub storage: Option<String>,
}

/// Arguments for `swt marker add`.
#[derive(Clone, Debug, Args)]
pub struct MarkerAddArgs {
    pub number: String,
    pub name: String,
    pub hex: String,
    /// Brand name, or `id:<brand-id>`.
    #[arg(long)]
    pub brand: Option<String>,
    /// Override the family derived from the hex.
    #[arg(long)]
    pub family: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
    #[command(flatten)]
    pub placement: PlacementArgs,
}

/// Arguments for `swt marker list`.
#[derive(Clone, Debug, Args)]
pub struct MarkerListArgs {
    #[arg(long)]
    pub family: Option<String>,
    /// Brand ID.
    #[arg(long)]
    pub brand: Option<String>,
    /// Grid ID or name.
    #[arg(long)]
    pub grid: Option<String>,
    /// Simple storage ID or name.
    #[arg(long)]
    pub storage: Option<String>,
    /// Substring of the number or color name.
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub limit: Option<u32>,
}

/// Arguments for `swt marker update`.
#[derive(Clone, Debug, Args)]
pub struct MarkerUpdateArgs {
    /// Marker ID or number.
    pub marker: String,
    #[arg(long)]
    pub number: Option<String>,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub hex: Option<String>,
    #[arg(long, conflicts_with = "clear_brand")]
    pub brand: Option<String>,
    #[arg(long)]
    pub clear_brand: bool,
    #[arg(long, conflicts_with = "clear_family")]
    pub family: Option<String>,
    #[arg(long)]
    pub clear_family: bool,
    #[arg(long, conflicts_with = "clear_notes")]
    pub notes: Option<String>,
    #[arg(long)]
    pub clear_notes: bool,
}

/// Marker commands. Markers are referenced by ID or number.
#[derive(Clone, Debug, Subcommand)]
pub enum MarkerCommands {
    /// Add a marker.
    Add(MarkerAddArgs),
    /// Get a marker.
    Get { marker: String },
    /// List markers.
    List(MarkerListArgs),
    /// Update a marker's details.
    Update(MarkerUpdateArgs),
    /// Move a marker to a grid cell or simple storage.
    Move {
        marker: String,
        #[command(flatten)]
        placement: PlacementArgs,
    },
    /// Delete a marker.
    Delete { marker: String },
    /// Pick a random marker.
    Random {
        #[arg(long)]
        family: Option<String>,
    },
}
