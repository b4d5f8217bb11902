use prople_jsonrpc_core::objects::RpcProcessor;

use rst_common::with_logging::log::info;

use crate::common::types::{CommonError, RPCService};
use crate::config::Config;

use super::shared::db::Builder as DbBuilder;
use super::wallet::{Runtime, Wallet};

/// `Manager` registers all wallet routes into a single [`RpcProcessor`]
pub struct Manager {
    processor: RpcProcessor,
    runtime: Option<Runtime>,
}

impl Manager {
    pub fn new() -> Self {
        Self {
            processor: RpcProcessor::default(),
            runtime: None,
        }
    }

    pub fn build_wallet_service(&mut self, conf: Config) -> Result<&mut Self, CommonError> {
        let agent = conf.agent().clone();
        let sync = conf.sync().clone();

        let mut db_builder = DbBuilder::new(conf);
        let db_executor = db_builder.build(|opts| opts.db().wallet.clone())?;

        let mut wallet_rpc = Wallet::new(db_executor, agent, sync);
        wallet_rpc.build()?;
        wallet_rpc.setup_rpc()?;

        let routes = wallet_rpc.routes();
        if routes.is_empty() {
            return Err(CommonError::RpcError(String::from(
                "wallet doesn't have any routes",
            )));
        }

        for route in routes.iter() {
            self.processor.register_route(route.clone());
        }

        info!("[manager] registered {} wallet routes", routes.len());
        self.runtime = wallet_rpc.runtime();
        Ok(self)
    }

    pub fn processor(&self) -> RpcProcessor {
        self.processor.clone()
    }

    pub fn runtime(&self) -> Result<Runtime, CommonError> {
        self.runtime.clone().ok_or(CommonError::InternalError(String::from(
            "wallet service has not been built",
        )))
    }
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}
