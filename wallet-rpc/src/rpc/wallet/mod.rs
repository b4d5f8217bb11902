use rstdev_storage::engine::rocksdb::executor::Executor;

use rst_common::standard::serde_json::Value;

use prople_jsonrpc_client::executor::reqwest::Reqwest as ReqwestExecutor;
use prople_jsonrpc_core::types::RpcRoute;

use prople_wallet_core::agent::TimedAgent;
use prople_wallet_core::connection::{
    Registry as ConnectionRegistry, Usecase as ConnectionUsecase,
};
use prople_wallet_core::credential::{
    Registry as CredentialRegistry, Usecase as CredentialUsecase,
};
use prople_wallet_core::sync::Scheduler;

use crate::common::types::{CommonError, RPCService};
use crate::config::{Agent as AgentConfig, SyncOptions};
use crate::rpc::agent::RpcClient as AgentRpc;
use crate::rpc::shared::method::build_rpc_method;

mod handler;
mod repository;
mod rpc_method;
mod rpc_param;
mod snapshot;
pub mod types;

pub use handler::WalletHandler;
pub use repository::Repository;
pub use rpc_method::Method;
pub use rpc_param::Param;
pub use snapshot::{persist_all, restore_all};

pub type AgentRpcClient = AgentRpc<ReqwestExecutor<Value>>;
pub type AgentImplementer = TimedAgent<AgentRpcClient>;
pub type ConnectionAPIImplementer = ConnectionUsecase<AgentImplementer, ConnectionRegistry>;
pub type CredentialAPIImplementer =
    CredentialUsecase<AgentImplementer, ConnectionRegistry, CredentialRegistry>;
pub type SchedulerImplementer = Scheduler<ConnectionAPIImplementer, CredentialAPIImplementer>;

/// `Runtime` is what the daemon needs outside of the JSON-RPC routes
#[derive(Clone)]
pub struct Runtime {
    scheduler: SchedulerImplementer,
    snapshots: Repository,
}

impl Runtime {
    pub fn scheduler(&self) -> SchedulerImplementer {
        self.scheduler.clone()
    }

    pub fn snapshots(&self) -> Repository {
        self.snapshots.clone()
    }
}

pub struct Wallet {
    executor: Executor,
    agent: AgentConfig,
    sync: SyncOptions,
    runtime: Option<Runtime>,
    routes: Vec<RpcRoute>,
}

impl Wallet {
    pub fn new(executor: Executor, agent: AgentConfig, sync: SyncOptions) -> Self {
        Self {
            executor,
            agent,
            sync,
            runtime: None,
            routes: Vec::new(),
        }
    }

    pub fn runtime(&self) -> Option<Runtime> {
        self.runtime.clone()
    }
}

impl RPCService for Wallet {
    fn build(&mut self) -> Result<(), CommonError> {
        let addr = self.agent.get_address()?;
        let rpc = AgentRpc::new(ReqwestExecutor::new(), addr);
        let agent = TimedAgent::new(rpc, self.agent.get_timeout());

        let connections = ConnectionRegistry::new();
        let connection_usecase = ConnectionUsecase::new(agent.clone(), connections.clone())
            .with_refresh_mode(self.sync.get_refresh_mode());

        let credential_usecase =
            CredentialUsecase::new(agent, connections, CredentialRegistry::new())
                .with_framing(self.sync.get_offer_framing());

        let scheduler = Scheduler::new(connection_usecase, credential_usecase)
            .with_eviction(self.sync.is_evict_materialized());

        self.runtime = Some(Runtime {
            scheduler,
            snapshots: Repository::new(self.executor.to_owned()),
        });

        Ok(())
    }

    fn setup_rpc(&mut self) -> Result<(), CommonError> {
        let runtime = self
            .runtime
            .as_ref()
            .ok_or(CommonError::InternalError(String::from(
                "missing wallet runtime",
            )))?;

        let scheduler = runtime.scheduler();
        let handler = WalletHandler::new(
            scheduler.connection(),
            scheduler.credential(),
            scheduler.clone(),
        );
        let controller = Box::new(handler);

        let methods = vec![
            Method::CreateFromInvitation,
            Method::GetConnection,
            Method::ListConnections,
            Method::ToggleSelected,
            Method::SendMessage,
            Method::RefreshStatus,
            Method::ReleaseConnection,
            Method::PairwiseInfo,
            Method::ExportConnection,
            Method::ListCredentials,
            Method::GetCredential,
            Method::ListOffers,
            Method::Tick,
        ];

        for method in methods {
            self.routes
                .push(RpcRoute::new(build_rpc_method(method), controller.clone()));
        }

        Ok(())
    }

    fn routes(&self) -> Vec<RpcRoute> {
        self.routes.clone()
    }
}
