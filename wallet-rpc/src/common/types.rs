use prople_jsonrpc_core::types::RpcRoute;
use rst_common::with_errors::thiserror::{self, Error};

#[derive(Debug, PartialEq, Error)]
pub enum CommonError {
    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("db error: {0}")]
    DbError(String),

    #[error("json error: {0}")]
    JSONError(String),

    #[error("internal error: {0}")]
    InternalError(String),

    #[error("method error: {0}")]
    MethodError(String),

    #[error("config error: {0}")]
    ConfigError(String),

    #[error("rpc error: {0}")]
    RpcError(String),
}

pub trait ToValidate {
    fn validate(&self) -> Result<(), CommonError>;
}

/// `RPCService` is a group of JSON-RPC routes sharing the same dependencies
pub trait RPCService {
    fn build(&mut self) -> Result<(), CommonError>;
    fn setup_rpc(&mut self) -> Result<(), CommonError>;
    fn routes(&self) -> Vec<RpcRoute>;
}
