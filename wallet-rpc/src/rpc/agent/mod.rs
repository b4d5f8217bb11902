//! `agent` is the JSON-RPC transport to the agent runtime
mod rpc_client;
mod rpc_method;
mod rpc_param;

pub use rpc_client::RpcClient;
pub use rpc_method::{Method, AGENT_RPC_METHOD_PREFIX};
pub use rpc_param::Param;
