use clap::{Parser, Subcommand};
use rst_common::with_logging::log::{info, warn};
use rst_common::with_tokio::tokio;

use prople_walletd::errors::WalletError;
use prople_walletd::svc::rpc::Rpc;

#[derive(Parser)]
#[command(name = "walletd")]
#[command(version = "1.0")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(name = "rpc")]
    #[command(about = "Running JSON-RPC server and the synchronization ticker")]
    Rpc {
        #[arg(short, long, value_name = "FILE")]
        #[arg(required = true)]
        config: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), WalletError> {
    let cli = Cli::parse();
    match &cli.command {
        Commands::Rpc { config } => {
            let config_file = config
                .to_owned()
                .ok_or(WalletError::RpcError(String::from("missing config file")))?;

            let rpc_server = Rpc::new(config_file);
            let (svc, ticker) = rpc_server.svc()?;

            if let Err(err) = ticker.restore().await {
                warn!("unable to restore connections: {}", err)
            }

            if ticker.is_enabled() {
                tokio::spawn(ticker.run());
            } else {
                info!("ticker disabled, waiting for sync.tick calls")
            }

            svc.serve().await?;
        }
    }

    Ok(())
}
