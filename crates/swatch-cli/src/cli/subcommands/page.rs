use clap::Subcommand;

/// Color page commands.
#[derive(Clone, Debug, Subcommand)]
pub enum PageCommands {
    /// Create a page. Colors are `HEX` or `HEX:label`.
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long = "color")]
        colors: Vec<String>,
    },
    /// Get a page by ID.
    Get { id: String },
    /// List pages.
    List,
    /// Rename a page.
    Rename { id: String, name: String },
    /// Append a color (`HEX` or `HEX:label`).
    AddColor { id: String, color: String },
    /// Remove the color at a 0-based position.
    RemoveColor { id: String, position: u32 },
    /// Delete a page.
    Delete { id: String },
}
