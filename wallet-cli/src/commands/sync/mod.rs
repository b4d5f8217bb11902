use clap::{Args, Subcommand};

mod handler;

pub use handler::handle_commands as sync_handler;

#[derive(Args, Clone)]
pub struct SyncArgs {
    #[command(subcommand)]
    pub commands: SyncCommands,
}

#[derive(Subcommand, Clone)]
#[command(subcommand_help_heading = "Sync")]
pub enum SyncCommands {
    /// Run a single synchronization pass right now
    Tick,
}
