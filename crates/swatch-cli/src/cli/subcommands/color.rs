use clap::Subcommand;

/// Color classification commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ColorCommands {
    /// Classify a hex color into its family.
    Classify {
        hex: String,
        /// Also report whether the color belongs to this family.
        #[arg(long)]
        family: Option<String>,
    },
    /// List every color family.
    Families,
}
