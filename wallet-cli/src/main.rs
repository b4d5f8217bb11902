use clap::{Parser, Subcommand};
use rst_common::with_logging::log::error;
use rst_common::with_tokio::tokio;
use rst_common::with_tracing::tracing_subscriber::{
    self, layer::SubscriberExt, util::SubscriberInitExt,
};

use prople_wallet_cli::commands::connection::{connection_handler, ConnectionArgs};
use prople_wallet_cli::commands::credential::{credential_handler, CredentialArgs};
use prople_wallet_cli::commands::handler::ContextHandler;
use prople_wallet_cli::commands::sync::{sync_handler, SyncArgs};
use prople_wallet_cli::types::WALLET_DEFAULT_ADDR;

#[derive(Parser)]
#[command(name = "prople-wallet-cli")]
#[command(version = "0.1.0")]
#[command(long_about = None)]
struct Cli {
    /// addr is the wallet JSON-RPC endpoint
    #[arg(long, global = true, default_value = WALLET_DEFAULT_ADDR)]
    addr: String,

    /// log_level used when `RUST_LOG` is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    commands: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Connection(ConnectionArgs),
    Credential(CredentialArgs),
    Sync(SyncArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = cli.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("prople_wallet_cli={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let ctx = ContextHandler::new(cli.addr);
    let result = match cli.commands {
        Commands::Connection(args) => connection_handler(&ctx, args.commands).await,
        Commands::Credential(args) => credential_handler(&ctx, args.commands).await,
        Commands::Sync(args) => sync_handler(&ctx, args.commands).await,
    };

    if let Err(err) = result {
        error!("{}", err)
    }
}
