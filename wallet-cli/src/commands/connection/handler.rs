use cli_table::{print_stdout, WithTitle};

use rst_common::standard::serde_json::{self, Value};
use rst_common::with_logging::log::{debug, info};

use prople_wallet_core::connection::types::RefreshMode;
use prople_wallet_core::connection::Connection;
use prople_wallet_rpc::components::wallet::{Method, Param};

use crate::commands::handler::ContextHandler;
use crate::types::CliError;
use crate::utils::rpc::call_wallet;

use super::types::ConnectionRow;
use super::ConnectionCommands;

fn print_connections(connections: Vec<Connection>) -> Result<(), CliError> {
    let rows = connections
        .into_iter()
        .map(ConnectionRow::from)
        .collect::<Vec<ConnectionRow>>();

    print_stdout(rows.with_title()).map_err(|err| CliError::TableError(err.to_string()))
}

fn parse_connection(value: Value) -> Result<Connection, CliError> {
    serde_json::from_value(value).map_err(|err| CliError::JSONError(err.to_string()))
}

fn parse_refresh_mode(mode: Option<String>) -> Result<Option<RefreshMode>, CliError> {
    match mode {
        Some(given) => serde_json::from_value(Value::String(given.to_lowercase()))
            .map(Some)
            .map_err(|err| CliError::JSONError(err.to_string())),
        None => Ok(None),
    }
}

fn print_json(label: &str, value: &Value) -> Result<(), CliError> {
    let out =
        serde_json::to_string_pretty(value).map_err(|err| CliError::JSONError(err.to_string()))?;

    info!("[{label}] response: {out}");
    Ok(())
}

pub async fn handle_commands(
    ctx: &ContextHandler,
    commands: ConnectionCommands,
) -> Result<(), CliError> {
    debug!("connection command handler triggered...");

    match commands {
        ConnectionCommands::Create(args) => {
            let resp = call_wallet(
                ctx,
                Method::CreateFromInvitation,
                Some(Param::CreateFromInvitation {
                    invitation: args.invitation,
                }),
            )
            .await?;

            print_connections(vec![parse_connection(resp)?])?;
        }
        ConnectionCommands::List => {
            let resp = call_wallet(ctx, Method::ListConnections, None).await?;
            let connections: Vec<Connection> = serde_json::from_value(resp)
                .map_err(|err| CliError::JSONError(err.to_string()))?;

            print_connections(connections)?;
        }
        ConnectionCommands::Get(args) => {
            let resp = call_wallet(
                ctx,
                Method::GetConnection,
                Some(Param::Connection { id: args.id }),
            )
            .await?;

            print_json("connection:get", &resp)?;
        }
        ConnectionCommands::Toggle(args) => {
            let resp = call_wallet(
                ctx,
                Method::ToggleSelected,
                Some(Param::Connection { id: args.id }),
            )
            .await?;

            print_connections(vec![parse_connection(resp)?])?;
        }
        ConnectionCommands::SendMessage(args) => {
            let resp = call_wallet(
                ctx,
                Method::SendMessage,
                Some(Param::SendMessage {
                    id: args.id,
                    message: args.message,
                }),
            )
            .await?;

            info!("[connection:send-message] message id: {}", resp);
        }
        ConnectionCommands::Refresh(args) => {
            let mode = parse_refresh_mode(args.mode)?;
            let resp = call_wallet(
                ctx,
                Method::RefreshStatus,
                Some(Param::RefreshStatus { id: args.id, mode }),
            )
            .await?;

            print_connections(vec![parse_connection(resp)?])?;
        }
        ConnectionCommands::Release(args) => {
            let resp = call_wallet(
                ctx,
                Method::ReleaseConnection,
                Some(Param::Connection { id: args.id }),
            )
            .await?;

            let released = parse_connection(resp)?;
            info!("[connection:release] released: {}", ConnectionRow::from(released).id);
        }
        ConnectionCommands::Pairwise(args) => {
            let resp = call_wallet(
                ctx,
                Method::PairwiseInfo,
                Some(Param::Connection { id: args.id }),
            )
            .await?;

            print_json("connection:pairwise", &resp)?;
        }
        ConnectionCommands::Export(args) => {
            let resp = call_wallet(
                ctx,
                Method::ExportConnection,
                Some(Param::Connection { id: args.id }),
            )
            .await?;

            print_json("connection:export", &resp)?;
        }
    }

    Ok(())
}
