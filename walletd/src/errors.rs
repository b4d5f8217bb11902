use rst_common::with_errors::thiserror::{self, Error};

use prople_jsonrpc_axum::rpc::RpcError;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("rpc error: {0}")]
    RpcError(String),

    #[error("sync error: {0}")]
    SyncError(String),
}

impl From<RpcError> for WalletError {
    fn from(value: RpcError) -> Self {
        WalletError::RpcError(value.to_string())
    }
}
