use cli_table::{print_stdout, WithTitle};

use rst_common::standard::serde_json;
use rst_common::with_logging::log::{debug, info};

use prople_wallet_core::credential::types::CredentialEntityAccessor;
use prople_wallet_core::credential::Credential;
use prople_wallet_rpc::components::wallet::{Method, Param};

use crate::commands::handler::ContextHandler;
use crate::types::CliError;
use crate::utils::rpc::call_wallet;

use super::types::CredentialRow;
use super::CredentialCommands;

fn print_credentials(credentials: Vec<Credential>) -> Result<(), CliError> {
    let rows = credentials
        .into_iter()
        .map(CredentialRow::from)
        .collect::<Vec<CredentialRow>>();

    print_stdout(rows.with_title()).map_err(|err| CliError::TableError(err.to_string()))
}

pub async fn handle_commands(
    ctx: &ContextHandler,
    commands: CredentialCommands,
) -> Result<(), CliError> {
    debug!("credential command handler triggered...");

    match commands {
        CredentialCommands::List => {
            let resp = call_wallet(ctx, Method::ListCredentials, None).await?;
            let credentials: Vec<Credential> = serde_json::from_value(resp)
                .map_err(|err| CliError::JSONError(err.to_string()))?;

            print_credentials(credentials)?;
        }
        CredentialCommands::Get(args) => {
            let resp = call_wallet(
                ctx,
                Method::GetCredential,
                Some(Param::Credential {
                    handle: args.handle,
                }),
            )
            .await?;

            let credential: Credential = serde_json::from_value(resp)
                .map_err(|err| CliError::JSONError(err.to_string()))?;

            let payload = credential.get_payload();
            print_credentials(vec![credential])?;
            if let Some(payload) = payload {
                info!("[credential:get] payload: {payload}");
            }
        }
        CredentialCommands::Offers(args) => {
            let resp = call_wallet(
                ctx,
                Method::ListOffers,
                Some(Param::Connection { id: args.id }),
            )
            .await?;

            let out = serde_json::to_string_pretty(&resp)
                .map_err(|err| CliError::JSONError(err.to_string()))?;

            info!("[credential:offers] response: {out}");
        }
    }

    Ok(())
}
