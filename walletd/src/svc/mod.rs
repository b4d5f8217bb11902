pub mod rpc;
pub mod sync;
