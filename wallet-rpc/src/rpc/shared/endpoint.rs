use multiaddr::{Multiaddr, Protocol};

use rst_common::with_errors::thiserror::{self, Error};

pub const RPC_PATH: &str = "/rpc";

#[derive(Debug, Error, PartialEq)]
pub enum EndpointError {
    #[error("rpc error: invalid addr: {0}")]
    InvalidMultiAddr(String),

    #[error("rpc error: empty addr")]
    EmptyMultiAddr,
}

/// build_endpoint used to parse given [`Multiaddr`] object into supported endpoint url
/// The parsed endpoint will only accept three protocols which are:
///
/// - [`Protocol::Ip4`]
/// - [`Protocol::Dns`]
/// - [`Protocol::Dns4`]
///
/// The second component is expected to be [`Protocol::Tcp`], otherwise port `80` is used
pub fn build_endpoint(addr: Multiaddr) -> Result<String, EndpointError> {
    if addr.is_empty() {
        return Err(EndpointError::EmptyMultiAddr);
    }

    let components = addr.iter().collect::<Vec<_>>();
    if components.len() < 2 {
        return Err(EndpointError::InvalidMultiAddr(String::from(
            "multiaddr length not valid",
        )));
    }

    let host = match &components[0] {
        Protocol::Ip4(ip) => Ok(format!("http://{}", ip)),
        Protocol::Dns(dns) => Ok(dns.to_string()),
        Protocol::Dns4(dns4) => Ok(dns4.to_string()),
        protocol => Err(EndpointError::InvalidMultiAddr(format!(
            "unknown protocol: {}",
            protocol
        ))),
    }?;

    let port = match components[1] {
        Protocol::Tcp(port) => port,
        _ => 80,
    };

    Ok(format!("{}:{}", host, port))
}

/// build_rpc_endpoint is [`build_endpoint`] plus the JSON-RPC path
pub fn build_rpc_endpoint(addr: Multiaddr) -> Result<String, EndpointError> {
    build_endpoint(addr).map(|endpoint| format!("{}{}", endpoint, RPC_PATH))
}
