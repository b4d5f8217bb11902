//! `prople-wallet-rpc` exposes the wallet through JSON-RPC and consumes the agent runtime
//! through JSON-RPC too
//!
//! The [`WalletRPC`] object is the entrypoint used by the daemon, it parses and validates
//! the configuration file and then builds the [`rpc::Manager`]
use std::time::Duration;

use prople_jsonrpc_core::objects::RpcProcessor;

pub mod common;
pub mod config;
pub mod rpc;

use common::helpers;
use common::types::CommonError;
use config::{Config, Parser as ConfigManager, SyncOptions};
use rpc::wallet::Runtime;
use rpc::Manager;

pub use rpc::{build_rpc_method, RpcMethodBuilder};

/// `components` re-exports the wallet method and parameter types used by the JSON-RPC clients
pub mod components {
    pub mod wallet {
        pub use crate::rpc::wallet::{Method, Param};
    }
}

pub struct WalletRPC {
    config: Config,
}

impl WalletRPC {
    pub fn new(conf_file: String) -> Result<Self, CommonError> {
        let config = ConfigManager::new(conf_file)
            .parse()
            .map_err(|err| CommonError::ConfigError(err.to_string()))?;

        helpers::validate(config.clone())?;
        Ok(Self { config })
    }

    pub fn build_app_config(&self) -> (String, String) {
        self.config.app().get_app_config()
    }

    pub fn build_request_timeout(&self) -> Duration {
        self.config.app().get_request_timeout()
    }

    pub fn build_sync_config(&self) -> SyncOptions {
        self.config.sync().clone()
    }

    pub fn build_rpc_wallet(&self) -> Result<(RpcProcessor, Runtime), CommonError> {
        let mut manager = Manager::new();
        manager.build_wallet_service(self.config.clone())?;

        Ok((manager.processor(), manager.runtime()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::env;
    use std::path::PathBuf;

    #[test]
    fn test_load_config() {
        let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        path.push("src/config/fixtures");

        let wallet_rpc = WalletRPC::new(format!("{}/config.toml", path.display()));
        assert!(!wallet_rpc.is_err());

        let wallet_rpc = wallet_rpc.unwrap();
        let (host, port) = wallet_rpc.build_app_config();
        assert_eq!(host, "localhost".to_string());
        assert_eq!(port, "8181".to_string());
        assert_eq!(wallet_rpc.build_request_timeout(), Duration::from_secs(90))
    }

    #[test]
    fn test_load_invalid_config() {
        let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        path.push("src/config/fixtures");

        let wallet_rpc = WalletRPC::new(format!("{}/config_app.toml", path.display()));
        assert!(wallet_rpc.is_err());
        assert!(matches!(
            wallet_rpc.err().unwrap(),
            CommonError::ConfigError(_)
        ))
    }
}
