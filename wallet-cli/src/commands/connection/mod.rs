use clap::{Args, Subcommand};

mod handler;
mod types;

pub use handler::handle_commands as connection_handler;

#[derive(Args, Clone)]
pub struct ConnectionArgs {
    #[command(subcommand)]
    pub commands: ConnectionCommands,
}

#[derive(Subcommand, Clone)]
#[command(subcommand_help_heading = "Connection")]
pub enum ConnectionCommands {
    /// Create a connection from an invitation JSON text
    #[command(name = "create")]
    Create(CreateArgs),

    /// List all tracked connections
    #[command(name = "list")]
    List,

    #[command(name = "get")]
    Get(ConnectionIDArgs),

    /// Flip the selection flag of a connection
    #[command(name = "toggle")]
    Toggle(ConnectionIDArgs),

    #[command(name = "send-message")]
    SendMessage(SendMessageArgs),

    /// Refresh the connection status from the agent runtime
    #[command(name = "refresh")]
    Refresh(RefreshArgs),

    /// Release the connection and forget all of its credentials
    #[command(name = "release")]
    Release(ConnectionIDArgs),

    #[command(name = "pairwise")]
    Pairwise(ConnectionIDArgs),

    /// Print the portable snapshot of a connection
    #[command(name = "export")]
    Export(ConnectionIDArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    /// invitation is the raw invitation JSON text, it must contains the `@id` field
    #[arg(long, short, required = true)]
    pub invitation: String,
}

#[derive(Args, Debug, Clone)]
pub struct ConnectionIDArgs {
    #[arg(long, required = true)]
    pub id: String,
}

#[derive(Args, Debug, Clone)]
pub struct SendMessageArgs {
    #[arg(long, required = true)]
    pub id: String,

    #[arg(long, short, required = true)]
    pub message: String,
}

#[derive(Args, Debug, Clone)]
pub struct RefreshArgs {
    #[arg(long, required = true)]
    pub id: String,

    /// mode is either `update` or `get`
    #[arg(long)]
    pub mode: Option<String>,
}
