use clap::Subcommand;

/// User commands.
#[derive(Clone, Debug, Subcommand)]
pub enum UserCommands {
    /// Create a user. The first user is always an admin.
    Create {
        username: String,
        #[arg(long)]
        admin: bool,
    },
    /// List users.
    List,
    /// Show the acting user.
    Whoami,
}
