//! `credential` drives the holder side of the credential issuance handshake
//!
//! For each tracked connection, an offer is consumed at most once. A credential created from
//! an offer sends its request, waits until the issuer accepts it and then its final payload
//! will be fetched exactly once.
mod credential;
mod offer;
mod registry;
mod usecase;

pub use credential::Credential;
pub use offer::Offer;
pub use registry::Registry;
pub use usecase::Usecase;

pub mod types;
