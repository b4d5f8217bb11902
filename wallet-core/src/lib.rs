//! `prople-wallet-core` contains the holder-side business logic of the `prople/wallet`
//! agent. The wallet never performs any cryptographic operation by itself, all of them
//! are delegated to an external agent runtime reachable through an agency relay.
//!
//! There are four sub-domains:
//!
//! - `agent`
//! - `connection`
//! - `credential`
//! - `sync`
//!
//! ---
//!
//! The `agent` sub-domain defines the boundary to the agent runtime through the
//! [`agent::types::AgentClient`] trait. Every operation is asynchronous and every
//! operation may fail, the wallet must survive both.
//!
//! ---
//!
//! The `connection` sub-domain maintains pairwise connections created from an
//! out-of-band invitation. A connection status is owned by the remote protocol, the wallet
//! only mirrors whatever the agent runtime reports.
//!
//! ---
//!
//! The `credential` sub-domain drives the credential issuance handshake for each connection:
//! offer, request and issuance, until the final credential is materialized.
//!
//! ---
//!
//! The `sync` sub-domain exposes the single `tick` entrypoint, one full synchronization
//! pass for both state machines.
pub mod agent;
pub mod connection;
pub mod credential;
pub mod sync;
pub mod types;
