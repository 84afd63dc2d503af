use clap::Subcommand;

/// Brand commands.
#[derive(Clone, Debug, Subcommand)]
pub enum BrandCommands {
    /// List brands.
    List,
    /// Delete an unused brand (admin only).
    Delete { id: String },
}
