use rst_common::standard::serde_json;
use rst_common::with_logging::log::{debug, info, warn};

use prople_wallet_core::sync::types::SyncReport;
use prople_wallet_rpc::components::wallet::Method;

use crate::commands::handler::ContextHandler;
use crate::types::CliError;
use crate::utils::rpc::call_wallet;

use super::SyncCommands;

pub async fn handle_commands(ctx: &ContextHandler, commands: SyncCommands) -> Result<(), CliError> {
    debug!("sync command handler triggered...");

    match commands {
        SyncCommands::Tick => {
            let resp = call_wallet(ctx, Method::Tick, None).await?;
            let report: SyncReport =
                serde_json::from_value(resp).map_err(|err| CliError::JSONError(err.to_string()))?;

            for failure in report.failures.iter() {
                warn!(
                    "[sync:tick] {:?} failed with {:?}: {}",
                    failure.entity, failure.kind, failure.message
                );
            }

            info!(
                "[sync:tick] failures: {} | materialized: {} | evicted: {}",
                report.failures.len(),
                report.materialized.len(),
                report.evicted
            );
        }
    }

    Ok(())
}
