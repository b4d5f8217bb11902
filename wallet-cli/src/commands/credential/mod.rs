use clap::{Args, Subcommand};

mod handler;
mod types;

pub use handler::handle_commands as credential_handler;

#[derive(Args, Clone)]
pub struct CredentialArgs {
    #[command(subcommand)]
    pub commands: CredentialCommands,
}

#[derive(Subcommand, Clone)]
#[command(subcommand_help_heading = "Credential")]
pub enum CredentialCommands {
    /// List all tracked credentials
    #[command(name = "list")]
    List,

    #[command(name = "get")]
    Get(CredentialHandleArgs),

    /// List the pending offers of a connection
    #[command(name = "offers")]
    Offers(OffersArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CredentialHandleArgs {
    #[arg(long, required = true)]
    pub handle: u32,
}

#[derive(Args, Debug, Clone)]
pub struct OffersArgs {
    /// id is the connection identifier
    #[arg(long, required = true)]
    pub id: String,
}
