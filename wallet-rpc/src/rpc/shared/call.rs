use multiaddr::Multiaddr;

use rst_common::standard::serde_json::Value;
use rst_common::with_errors::thiserror::{self, Error};

use prople_jsonrpc_client::types::{Executor, RpcValue};
use prople_jsonrpc_core::types::RpcMethod;

use super::endpoint::{build_rpc_endpoint, EndpointError};

#[derive(Debug, Error)]
pub enum CallError {
    #[error("call error: endpoint: {0}")]
    EndpointError(EndpointError),

    #[error("call error: executor: {0}")]
    ExecutorError(String),

    #[error("call error: response: {0}")]
    ResponseError(String),
}

/// `call` sends a single JSON-RPC request to the server located at `addr`
///
/// A response carrying an error object is turned into [`CallError::ResponseError`], an empty
/// `result` is still a success and given back as `None`
pub async fn call<TExecutor, TParam>(
    client: TExecutor,
    addr: Multiaddr,
    method: RpcMethod,
    param: Option<TParam>,
) -> Result<Option<Value>, CallError>
where
    TExecutor: Executor<Value>,
    TParam: RpcValue + Send + Sync,
{
    let endpoint = build_rpc_endpoint(addr).map_err(CallError::EndpointError)?;
    let resp = client
        .call(endpoint, param, method.to_string(), None)
        .await
        .map_err(|err| CallError::ExecutorError(err.to_string()))?;

    if let Some(err) = resp.error {
        return Err(CallError::ResponseError(format!("{:?}", err)));
    }

    Ok(resp.result)
}
