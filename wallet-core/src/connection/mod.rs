//! `connection` tracks pairwise connections created from out-of-band invitations
//!
//! A connection moves through these statuses, always reported by the agent runtime:
//!
//! ```text
//! Initialized -> RequestSent -> OfferReceived -> Accepted
//! ```
//!
//! The wallet only asks the agent runtime to connect while the connection is still
//! `Initialized`, any other progression belongs to the remote side.
mod connection;
mod invitation;
mod registry;
mod usecase;

pub use connection::Connection;
pub use invitation::Invitation;
pub use registry::Registry;
pub use usecase::Usecase;

pub mod types;
