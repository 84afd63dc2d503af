use clap::Subcommand;

/// Simple storage commands. Storages are referenced by ID or name.
#[derive(Clone, Debug, Subcommand)]
pub enum StorageCommands {
    /// Create a simple storage.
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// List simple storages.
    List,
    /// Show a storage and the markers in it.
    Show { storage: String },
    /// Rename a storage or change its description.
    Update {
        storage: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, conflicts_with = "clear_description")]
        description: Option<String>,
        #[arg(long)]
        clear_description: bool,
    },
    /// Delete an empty storage.
    Delete { storage: String },
}
