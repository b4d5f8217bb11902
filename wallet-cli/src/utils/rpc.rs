use std::fmt::Debug;

use rst_common::standard::serde::de::DeserializeOwned;
use rst_common::standard::serde_json::Value;
use rst_common::with_logging::log::debug;

use prople_jsonrpc_client::executor::reqwest::Reqwest;
use prople_jsonrpc_client::types::Executor;

use prople_wallet_rpc::build_rpc_method;
use prople_wallet_rpc::components::wallet::{Method, Param};

use crate::commands::handler::ContextHandler;
use crate::types::CliError;

pub fn build_client<TResp>() -> impl Executor<TResp>
where
    TResp: DeserializeOwned + Clone + Send + Sync + Debug,
{
    Reqwest::<TResp>::new()
}

/// `call_wallet` sends a single wallet method and gives back its `result`
pub async fn call_wallet(
    ctx: &ContextHandler,
    method: Method,
    param: Option<Param>,
) -> Result<Value, CliError> {
    let rpc_method = build_rpc_method(method);
    debug!("[rpc] calling {} at {}", rpc_method.to_string(), ctx.addr());

    let client = build_client::<Value>();
    let resp = client
        .call(ctx.addr(), param, rpc_method.to_string(), None)
        .await
        .map_err(|err| CliError::RpcError(err.to_string()))?;

    if let Some(err) = resp.error {
        return Err(CliError::RpcError(format!("{:?}", err)));
    }

    resp.result
        .ok_or(CliError::RpcError(String::from("missing result")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    use rst_common::standard::serde_json::json;
    use rst_common::with_tokio::tokio;

    #[tokio::test]
    async fn test_call_wallet() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/rpc")
            .match_body(Matcher::PartialJson(json!({
                "method": "prople.wallet.connection.get",
                "params": {"param": "Connection", "payload": {"id": "abc123"}}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"jsonrpc":"2.0","result":{"id":"abc123"},"error":null,"id":1}"#)
            .create_async()
            .await;

        let ctx = ContextHandler::new(format!("{}/rpc", server.url()));
        let output = call_wallet(
            &ctx,
            Method::GetConnection,
            Some(Param::Connection {
                id: String::from("abc123"),
            }),
        )
        .await;

        assert!(!output.is_err());
        assert_eq!(output.unwrap(), json!({"id": "abc123"}));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_call_wallet_missing_result() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/rpc")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"jsonrpc":"2.0","result":null,"error":null,"id":1}"#)
            .create_async()
            .await;

        let ctx = ContextHandler::new(format!("{}/rpc", server.url()));
        let output = call_wallet(&ctx, Method::Tick, None).await;

        assert!(output.is_err());
        assert!(matches!(output.unwrap_err(), CliError::RpcError(_)))
    }
}
