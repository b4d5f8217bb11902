mod shared;
pub use shared::call::{call, CallError};
pub use shared::db::Builder as DbBuilder;
pub use shared::endpoint::{build_endpoint, build_rpc_endpoint, EndpointError};
pub use shared::method::{build_rpc_method, RpcMethodBuilder, RPC_METHOD_PREFIX};

pub mod agent;
pub mod wallet;

mod manager;
pub use manager::Manager;
