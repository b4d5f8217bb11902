use rst_common::with_http_tokio::axum::routing::post;
use rst_common::with_http_tokio::axum::Router;
use rst_common::with_http_tokio::tower_http::timeout::TimeoutLayer;
use rst_common::with_http_tokio::tower_http::trace::TraceLayer;
use rst_common::with_tracing::tracing_subscriber::{
    self, layer::SubscriberExt, util::SubscriberInitExt,
};

use prople_jsonrpc_axum::rpc::{Rpc as RpcAxum, RpcConfig, RpcError, RpcHandlerFn, RpcState};
use prople_wallet_rpc::WalletRPC;

use super::sync::Ticker;

pub struct Rpc {
    config: String,
}

impl Rpc {
    pub fn new(config: String) -> Rpc {
        Self { config }
    }

    /// `svc` builds the JSON-RPC server and the [`Ticker`] sharing the same wallet state
    pub fn svc(&self) -> Result<(RpcAxum, Ticker), RpcError> {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                    format!(
                        "{}=debug,prople_wallet_core=debug,prople_wallet_rpc=debug,tower_http=debug,axum=trace",
                        env!("CARGO_CRATE_NAME")
                    )
                    .into()
                }),
            )
            .with(tracing_subscriber::fmt::layer().without_time())
            .init();

        let wallet_rpc = WalletRPC::new(self.config.to_owned())
            .map_err(|err| RpcError::AxumError(err.to_string()))?;

        let (processor, runtime) = wallet_rpc
            .build_rpc_wallet()
            .map_err(|err| RpcError::AxumError(err.to_string()))?;

        let rpc_state = RpcState::new(processor);
        let rpc_app = Router::new().route("/rpc", post(RpcHandlerFn)).layer((
            TraceLayer::new_for_http(),
            TimeoutLayer::new(wallet_rpc.build_request_timeout()),
        ));

        let (host, port) = wallet_rpc.build_app_config();
        let axum_config = RpcConfig::new(host, port);

        let ticker = Ticker::new(runtime, wallet_rpc.build_sync_config().get_interval());
        Ok((RpcAxum::new(axum_config, rpc_state, rpc_app), ticker))
    }
}
