use prople_jsonrpc_core::types::RpcMethod;

pub const RPC_METHOD_PREFIX: &str = "prople.wallet";

pub trait RpcMethodBuilder {
    fn build_path(&self) -> &str;

    fn prefix(&self) -> &str {
        RPC_METHOD_PREFIX
    }
}

pub fn build_rpc_method(method: impl RpcMethodBuilder) -> RpcMethod {
    RpcMethod::from(format!("{}.{}", method.prefix(), method.build_path()))
}
