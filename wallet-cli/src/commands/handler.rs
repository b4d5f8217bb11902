use rst_common::with_logging::log::debug;

use crate::types::WALLET_DEFAULT_ADDR;

/// `ContextHandler` carries the values shared by all command handlers
pub struct ContextHandler {
    addr: String,
}

impl ContextHandler {
    pub fn new(addr: String) -> Self {
        debug!("[ctx] wallet address: {addr}");
        Self { addr }
    }

    pub fn addr(&self) -> String {
        self.addr.clone()
    }
}

impl Default for ContextHandler {
    fn default() -> Self {
        Self::new(String::from(WALLET_DEFAULT_ADDR))
    }
}
