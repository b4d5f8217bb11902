use std::future::Future;
use std::time::Duration;

use rst_common::standard::async_trait::async_trait;
use rst_common::standard::serde_json::Value;
use rst_common::with_logging::log::warn;
use rst_common::with_tokio::tokio;

use crate::types::{Handle, StatusCode};

use super::types::{AgentClient, AgentError, ConnectionType, MessageOptions};

pub const DEFAULT_CALL_TIMEOUT_SECS: u64 = 30;

/// `call_with_timeout` awaits the given agent call at most `limit` long
///
/// An expired call is turned into [`AgentError::Timeout`], the caller is free to retry it
/// on the next synchronization pass
pub async fn call_with_timeout<T, F>(limit: Duration, operation: &str, call: F) -> Result<T, AgentError>
where
    F: Future<Output = Result<T, AgentError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(output) => output,
        Err(_) => {
            warn!("[agent:{operation}] no response after {}ms", limit.as_millis());
            Err(AgentError::Timeout(format!(
                "{} exceeded {}ms",
                operation,
                limit.as_millis()
            )))
        }
    }
}

/// `TimedAgent` wraps any [`AgentClient`] implementation and bounds every call with
/// the same timeout
#[derive(Clone)]
pub struct TimedAgent<TAgent>
where
    TAgent: AgentClient,
{
    agent: TAgent,
    limit: Duration,
}

impl<TAgent> TimedAgent<TAgent>
where
    TAgent: AgentClient,
{
    pub fn new(agent: TAgent, limit: Duration) -> Self {
        Self { agent, limit }
    }

    pub fn with_default_timeout(agent: TAgent) -> Self {
        Self::new(agent, Duration::from_secs(DEFAULT_CALL_TIMEOUT_SECS))
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }
}

#[async_trait]
impl<TAgent> AgentClient for TimedAgent<TAgent>
where
    TAgent: AgentClient,
{
    async fn connection_create(
        &self,
        invite_id: String,
        invite_details: Value,
    ) -> Result<Handle, AgentError> {
        call_with_timeout(
            self.limit,
            "connection_create",
            self.agent.connection_create(invite_id, invite_details),
        )
        .await
    }

    async fn connection_connect(
        &self,
        handle: Handle,
        connection_type: ConnectionType,
    ) -> Result<(), AgentError> {
        call_with_timeout(
            self.limit,
            "connection_connect",
            self.agent.connection_connect(handle, connection_type),
        )
        .await
    }

    async fn connection_get_state(&self, handle: Handle) -> Result<StatusCode, AgentError> {
        call_with_timeout(
            self.limit,
            "connection_get_state",
            self.agent.connection_get_state(handle),
        )
        .await
    }

    async fn connection_update_state(&self, handle: Handle) -> Result<StatusCode, AgentError> {
        call_with_timeout(
            self.limit,
            "connection_update_state",
            self.agent.connection_update_state(handle),
        )
        .await
    }

    async fn connection_send_message(
        &self,
        handle: Handle,
        message: String,
        options: MessageOptions,
    ) -> Result<String, AgentError> {
        call_with_timeout(
            self.limit,
            "connection_send_message",
            self.agent.connection_send_message(handle, message, options),
        )
        .await
    }

    async fn connection_release(&self, handle: Handle) -> Result<(), AgentError> {
        call_with_timeout(
            self.limit,
            "connection_release",
            self.agent.connection_release(handle),
        )
        .await
    }

    async fn connection_serialize(&self, handle: Handle) -> Result<String, AgentError> {
        call_with_timeout(
            self.limit,
            "connection_serialize",
            self.agent.connection_serialize(handle),
        )
        .await
    }

    async fn connection_deserialize(&self, serialized: String) -> Result<Handle, AgentError> {
        call_with_timeout(
            self.limit,
            "connection_deserialize",
            self.agent.connection_deserialize(serialized),
        )
        .await
    }

    async fn connection_get_pw_did(&self, handle: Handle) -> Result<String, AgentError> {
        call_with_timeout(
            self.limit,
            "connection_get_pw_did",
            self.agent.connection_get_pw_did(handle),
        )
        .await
    }

    async fn connection_get_their_pw_did(&self, handle: Handle) -> Result<String, AgentError> {
        call_with_timeout(
            self.limit,
            "connection_get_their_pw_did",
            self.agent.connection_get_their_pw_did(handle),
        )
        .await
    }

    async fn credential_get_offers(&self, handle: Handle) -> Result<String, AgentError> {
        call_with_timeout(
            self.limit,
            "credential_get_offers",
            self.agent.credential_get_offers(handle),
        )
        .await
    }

    async fn credential_create_with_offer(
        &self,
        source_id: String,
        offer: String,
    ) -> Result<Handle, AgentError> {
        call_with_timeout(
            self.limit,
            "credential_create_with_offer",
            self.agent.credential_create_with_offer(source_id, offer),
        )
        .await
    }

    async fn credential_send_request(
        &self,
        credential_handle: Handle,
        connection_handle: Handle,
    ) -> Result<(), AgentError> {
        call_with_timeout(
            self.limit,
            "credential_send_request",
            self.agent
                .credential_send_request(credential_handle, connection_handle),
        )
        .await
    }

    async fn credential_update_state_v2(
        &self,
        credential_handle: Handle,
        connection_handle: Handle,
    ) -> Result<StatusCode, AgentError> {
        call_with_timeout(
            self.limit,
            "credential_update_state_v2",
            self.agent
                .credential_update_state_v2(credential_handle, connection_handle),
        )
        .await
    }

    async fn get_credential(&self, credential_handle: Handle) -> Result<String, AgentError> {
        call_with_timeout(
            self.limit,
            "get_credential",
            self.agent.get_credential(credential_handle),
        )
        .await
    }
}
