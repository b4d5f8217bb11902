use rst_common::with_errors::thiserror::{self, Error};

pub const WALLET_DEFAULT_ADDR: &str = "http://localhost:8181/rpc";

#[derive(Debug, Error)]
pub enum CliError {
    #[error("rpc error: {0}")]
    RpcError(String),

    #[error("json error: {0}")]
    JSONError(String),

    #[error("table error: {0}")]
    TableError(String),
}
