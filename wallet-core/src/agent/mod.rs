//! `agent` is the boundary between the wallet and the agent runtime
//!
//! The runtime is consumed, never implemented, by this crate. The concrete transport
//! lives at `prople-wallet-rpc`, tests use `mockall` doubles of [`types::AgentClient`]
mod timed;

#[cfg(test)]
pub(crate) mod fake;

pub use timed::{call_with_timeout, TimedAgent, DEFAULT_CALL_TIMEOUT_SECS};

pub mod types;
