use multiaddr::Multiaddr;

use rst_common::standard::async_trait::async_trait;
use rst_common::standard::serde::de::DeserializeOwned;
use rst_common::standard::serde_json::{self, Value};
use rst_common::with_logging::log::debug;

use prople_jsonrpc_client::types::Executor;

use prople_wallet_core::agent::types::{AgentClient, AgentError, ConnectionType, MessageOptions};
use prople_wallet_core::types::{Handle, StatusCode};

use crate::rpc::shared::call::{call, CallError};
use crate::rpc::shared::method::{build_rpc_method, RpcMethodBuilder};

use super::rpc_method::Method;
use super::rpc_param::Param;

/// `RpcClient` is an [`AgentClient`] talking to an agent runtime exposed through JSON-RPC
#[derive(Clone)]
pub struct RpcClient<TExecutor>
where
    TExecutor: Executor<Value> + Clone,
{
    client: TExecutor,
    addr: Multiaddr,
}

impl<TExecutor> RpcClient<TExecutor>
where
    TExecutor: Executor<Value> + Clone + Send + Sync,
{
    pub fn new(client: TExecutor, addr: Multiaddr) -> Self {
        Self { client, addr }
    }

    async fn request(&self, method: Method, param: Param) -> Result<Option<Value>, AgentError> {
        debug!("[agent:rpc] calling: {}", method.build_path());

        call(
            self.client.clone(),
            self.addr.clone(),
            build_rpc_method(method),
            Some(param),
        )
        .await
        .map_err(|err| match err {
            CallError::EndpointError(e) => AgentError::CallFailed(e.to_string()),
            CallError::ExecutorError(e) => AgentError::CallFailed(e),
            CallError::ResponseError(e) => AgentError::CallFailed(e),
        })
    }

    async fn request_value<T>(&self, method: Method, param: Param) -> Result<T, AgentError>
    where
        T: DeserializeOwned,
    {
        let path = method.build_path().to_string();
        let value = self
            .request(method, param)
            .await?
            .ok_or(AgentError::InvalidResponse(format!("{}: missing result", path)))?;

        serde_json::from_value(value)
            .map_err(|err| AgentError::InvalidResponse(format!("{}: {}", path, err)))
    }
}

#[async_trait]
impl<TExecutor> AgentClient for RpcClient<TExecutor>
where
    TExecutor: Executor<Value> + Clone + Send + Sync,
{
    async fn connection_create(
        &self,
        invite_id: String,
        invite_details: Value,
    ) -> Result<Handle, AgentError> {
        self.request_value(
            Method::ConnectionCreate,
            Param::ConnectionCreate {
                invite_id,
                invite_details,
            },
        )
        .await
    }

    async fn connection_connect(
        &self,
        handle: Handle,
        connection_type: ConnectionType,
    ) -> Result<(), AgentError> {
        let _ = self
            .request(
                Method::ConnectionConnect,
                Param::ConnectionConnect {
                    handle,
                    connection_type,
                },
            )
            .await?;

        Ok(())
    }

    async fn connection_get_state(&self, handle: Handle) -> Result<StatusCode, AgentError> {
        self.request_value(Method::ConnectionGetState, Param::ConnectionHandle { handle })
            .await
    }

    async fn connection_update_state(&self, handle: Handle) -> Result<StatusCode, AgentError> {
        self.request_value(
            Method::ConnectionUpdateState,
            Param::ConnectionHandle { handle },
        )
        .await
    }

    async fn connection_send_message(
        &self,
        handle: Handle,
        message: String,
        options: MessageOptions,
    ) -> Result<String, AgentError> {
        self.request_value(
            Method::ConnectionSendMessage,
            Param::ConnectionSendMessage {
                handle,
                message,
                options,
            },
        )
        .await
    }

    async fn connection_release(&self, handle: Handle) -> Result<(), AgentError> {
        let _ = self
            .request(Method::ConnectionRelease, Param::ConnectionHandle { handle })
            .await?;

        Ok(())
    }

    async fn connection_serialize(&self, handle: Handle) -> Result<String, AgentError> {
        self.request_value(Method::ConnectionSerialize, Param::ConnectionHandle { handle })
            .await
    }

    async fn connection_deserialize(&self, serialized: String) -> Result<Handle, AgentError> {
        self.request_value(
            Method::ConnectionDeserialize,
            Param::ConnectionDeserialize { serialized },
        )
        .await
    }

    async fn connection_get_pw_did(&self, handle: Handle) -> Result<String, AgentError> {
        self.request_value(Method::ConnectionGetPwDID, Param::ConnectionHandle { handle })
            .await
    }

    async fn connection_get_their_pw_did(&self, handle: Handle) -> Result<String, AgentError> {
        self.request_value(
            Method::ConnectionGetTheirPwDID,
            Param::ConnectionHandle { handle },
        )
        .await
    }

    async fn credential_get_offers(&self, handle: Handle) -> Result<String, AgentError> {
        self.request_value(Method::CredentialGetOffers, Param::ConnectionHandle { handle })
            .await
    }

    async fn credential_create_with_offer(
        &self,
        source_id: String,
        offer: String,
    ) -> Result<Handle, AgentError> {
        self.request_value(
            Method::CredentialCreateWithOffer,
            Param::CredentialCreateWithOffer { source_id, offer },
        )
        .await
    }

    async fn credential_send_request(
        &self,
        credential_handle: Handle,
        connection_handle: Handle,
    ) -> Result<(), AgentError> {
        let _ = self
            .request(
                Method::CredentialSendRequest,
                Param::CredentialExchange {
                    credential_handle,
                    connection_handle,
                },
            )
            .await?;

        Ok(())
    }

    async fn credential_update_state_v2(
        &self,
        credential_handle: Handle,
        connection_handle: Handle,
    ) -> Result<StatusCode, AgentError> {
        self.request_value(
            Method::CredentialUpdateStateV2,
            Param::CredentialExchange {
                credential_handle,
                connection_handle,
            },
        )
        .await
    }

    async fn get_credential(&self, credential_handle: Handle) -> Result<String, AgentError> {
        self.request_value(
            Method::CredentialGetCredential,
            Param::CredentialHandle { credential_handle },
        )
        .await
    }
}
