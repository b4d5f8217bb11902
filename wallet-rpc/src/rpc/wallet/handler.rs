use std::future::Future;
use std::sync::Arc;

use rst_common::standard::async_trait::async_trait;
use rst_common::standard::serde_json::Value;
use rst_common::with_logging::log::{debug, error};
use rst_common::with_tokio::tokio;

use prople_jsonrpc_core::types::{RpcError, RpcHandler, RpcHandlerOutput, RpcMethod};

use prople_wallet_core::connection::types::{ConnectionAPI, ConnectionID};
use prople_wallet_core::connection::Connection;
use prople_wallet_core::credential::types::CredentialAPI;
use prople_wallet_core::credential::Credential;
use prople_wallet_core::sync::types::SyncAPI;

use super::rpc_method::Method;
use super::rpc_param::Param;

/// `WalletHandler` serves every wallet method through a single [`RpcHandler`]
///
/// Releasing and refreshing a connection go through the [`SyncAPI`], they never interleave
/// with a running synchronization pass.
///
/// Operations holding agent handles or the pass lock run on their own task, a dropped
/// request does not cancel them halfway
#[derive(Clone)]
pub struct WalletHandler<TConnection, TCredential, TSync>
where
    TConnection: ConnectionAPI<EntityAccessor = Connection>,
    TCredential: CredentialAPI<EntityAccessor = Credential>,
    TSync: SyncAPI<EntityAccessor = Connection>,
{
    connection_api: Arc<TConnection>,
    credential_api: TCredential,
    sync_api: Arc<TSync>,
}

async fn detach<F, T>(operation: F) -> Result<T, RpcError>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(operation).await.map_err(|err| {
        error!("[wallet:rpc] detached operation aborted: {}", err);
        RpcError::InternalError
    })
}

impl<TConnection, TCredential, TSync> WalletHandler<TConnection, TCredential, TSync>
where
    TConnection: ConnectionAPI<EntityAccessor = Connection> + 'static,
    TCredential: CredentialAPI<EntityAccessor = Credential>,
    TSync: SyncAPI<EntityAccessor = Connection> + 'static,
{
    pub fn new(connection_api: TConnection, credential_api: TCredential, sync_api: TSync) -> Self {
        Self {
            connection_api: Arc::new(connection_api),
            credential_api,
            sync_api: Arc::new(sync_api),
        }
    }

    async fn create_from_invitation(&self, param: Param) -> RpcHandlerOutput {
        match param {
            Param::CreateFromInvitation { invitation } => {
                let connection_api = self.connection_api.clone();
                let result = detach(async move {
                    connection_api.create_from_invitation(invitation).await
                })
                .await?
                .map_err(|err| RpcError::HandlerError(err.to_string()))?;

                Ok(Some(Box::new(result)))
            }
            _ => Err(RpcError::InvalidParams),
        }
    }

    async fn get_connection(&self, param: Param) -> RpcHandlerOutput {
        match param {
            Param::Connection { id } => {
                let result = self
                    .connection_api
                    .get_connection(ConnectionID::from(id))
                    .await
                    .map_err(|err| RpcError::HandlerError(err.to_string()))?;

                Ok(Some(Box::new(result)))
            }
            _ => Err(RpcError::InvalidParams),
        }
    }

    async fn list_connections(&self) -> RpcHandlerOutput {
        let result = self
            .connection_api
            .list_connections()
            .await
            .map_err(|err| RpcError::HandlerError(err.to_string()))?;

        Ok(Some(Box::new(result)))
    }

    async fn toggle_selected(&self, param: Param) -> RpcHandlerOutput {
        match param {
            Param::Connection { id } => {
                let result = self
                    .connection_api
                    .toggle_selected(ConnectionID::from(id))
                    .await
                    .map_err(|err| RpcError::HandlerError(err.to_string()))?;

                Ok(Some(Box::new(result)))
            }
            _ => Err(RpcError::InvalidParams),
        }
    }

    async fn send_message(&self, param: Param) -> RpcHandlerOutput {
        match param {
            Param::SendMessage { id, message } => {
                let result = self
                    .connection_api
                    .send_message(ConnectionID::from(id), message)
                    .await
                    .map_err(|err| RpcError::HandlerError(err.to_string()))?;

                Ok(Some(Box::new(result)))
            }
            _ => Err(RpcError::InvalidParams),
        }
    }

    async fn refresh_status(&self, param: Param) -> RpcHandlerOutput {
        match param {
            Param::RefreshStatus { id, mode } => {
                let sync_api = self.sync_api.clone();
                let result = detach(async move {
                    sync_api
                        .refresh_connection(ConnectionID::from(id), mode.unwrap_or_default())
                        .await
                })
                .await?
                .map_err(|err| RpcError::HandlerError(err.to_string()))?;

                Ok(Some(Box::new(result)))
            }
            _ => Err(RpcError::InvalidParams),
        }
    }

    async fn release_connection(&self, param: Param) -> RpcHandlerOutput {
        match param {
            Param::Connection { id } => {
                let sync_api = self.sync_api.clone();
                let result = detach(async move {
                    sync_api.release_connection(ConnectionID::from(id)).await
                })
                .await?
                .map_err(|err| RpcError::HandlerError(err.to_string()))?;

                Ok(Some(Box::new(result)))
            }
            _ => Err(RpcError::InvalidParams),
        }
    }

    async fn pairwise_info(&self, param: Param) -> RpcHandlerOutput {
        match param {
            Param::Connection { id } => {
                let result = self
                    .connection_api
                    .pairwise_info(ConnectionID::from(id))
                    .await
                    .map_err(|err| RpcError::HandlerError(err.to_string()))?;

                Ok(Some(Box::new(result)))
            }
            _ => Err(RpcError::InvalidParams),
        }
    }

    async fn export_connection(&self, param: Param) -> RpcHandlerOutput {
        match param {
            Param::Connection { id } => {
                let result = self
                    .connection_api
                    .export_connection(ConnectionID::from(id))
                    .await
                    .map_err(|err| RpcError::HandlerError(err.to_string()))?;

                Ok(Some(Box::new(result)))
            }
            _ => Err(RpcError::InvalidParams),
        }
    }

    async fn list_credentials(&self) -> RpcHandlerOutput {
        let result = self
            .credential_api
            .list_credentials()
            .await
            .map_err(|err| RpcError::HandlerError(err.to_string()))?;

        Ok(Some(Box::new(result)))
    }

    async fn get_credential(&self, param: Param) -> RpcHandlerOutput {
        match param {
            Param::Credential { handle } => {
                let result = self
                    .credential_api
                    .get_credential(handle)
                    .await
                    .map_err(|err| RpcError::HandlerError(err.to_string()))?;

                Ok(Some(Box::new(result)))
            }
            _ => Err(RpcError::InvalidParams),
        }
    }

    async fn list_offers(&self, param: Param) -> RpcHandlerOutput {
        match param {
            Param::Connection { id } => {
                let result = self
                    .credential_api
                    .list_offers(ConnectionID::from(id))
                    .await
                    .map_err(|err| RpcError::HandlerError(err.to_string()))?;

                Ok(Some(Box::new(result)))
            }
            _ => Err(RpcError::InvalidParams),
        }
    }

    async fn tick(&self) -> RpcHandlerOutput {
        let sync_api = self.sync_api.clone();
        let result = detach(async move { sync_api.tick().await })
            .await?
            .map_err(|err| RpcError::HandlerError(err.to_string()))?;

        Ok(Some(Box::new(result)))
    }
}

#[async_trait]
impl<TConnection, TCredential, TSync> RpcHandler for WalletHandler<TConnection, TCredential, TSync>
where
    TConnection: ConnectionAPI<EntityAccessor = Connection> + 'static,
    TCredential: CredentialAPI<EntityAccessor = Credential>,
    TSync: SyncAPI<EntityAccessor = Connection> + 'static,
{
    async fn call(&self, method: RpcMethod, params: Option<Value>) -> RpcHandlerOutput {
        let rpc_method = Method::try_from(method).map_err(|_| RpcError::InternalError)?;
        debug!("[wallet:rpc] handling: {:?}", rpc_method);

        if !rpc_method.need_params() {
            return match rpc_method {
                Method::ListConnections => self.list_connections().await,
                Method::ListCredentials => self.list_credentials().await,
                Method::Tick => self.tick().await,
                _ => Err(RpcError::InternalError),
            };
        }

        let param_value = params.ok_or(RpcError::InvalidParams)?;
        let rpc_param = Param::try_from(param_value).map_err(|_| RpcError::ParseError)?;

        match rpc_method {
            Method::CreateFromInvitation => self.create_from_invitation(rpc_param).await,
            Method::GetConnection => self.get_connection(rpc_param).await,
            Method::ToggleSelected => self.toggle_selected(rpc_param).await,
            Method::SendMessage => self.send_message(rpc_param).await,
            Method::RefreshStatus => self.refresh_status(rpc_param).await,
            Method::ReleaseConnection => self.release_connection(rpc_param).await,
            Method::PairwiseInfo => self.pairwise_info(rpc_param).await,
            Method::ExportConnection => self.export_connection(rpc_param).await,
            Method::GetCredential => self.get_credential(rpc_param).await,
            Method::ListOffers => self.list_offers(rpc_param).await,
            _ => Err(RpcError::InternalError),
        }
    }
}
