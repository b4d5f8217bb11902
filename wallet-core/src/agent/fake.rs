use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rst_common::standard::async_trait::async_trait;
use rst_common::standard::serde_json::Value;
use rst_common::with_tokio::tokio;

use crate::types::{Handle, StatusCode};

use super::types::{AgentClient, AgentError, ConnectionType, MessageOptions};

const FIRST_HANDLE: Handle = 7;

/// `SlowAgent` is an in-process agent runtime answering every connection call after `delay`
///
/// Each created connection receives a fresh handle, starting from 7. Credential offers are
/// always empty
#[derive(Clone, Default)]
pub(crate) struct SlowAgent {
    delay: Duration,
    next_handle: Arc<AtomicU32>,
    created: Arc<Mutex<Vec<Handle>>>,
    released: Arc<Mutex<Vec<Handle>>>,
}

impl SlowAgent {
    pub(crate) fn new(delay: Duration) -> Self {
        Self {
            delay,
            ..Default::default()
        }
    }

    pub(crate) fn created(&self) -> Vec<Handle> {
        self.created.lock().unwrap().clone()
    }

    pub(crate) fn released(&self) -> Vec<Handle> {
        self.released.lock().unwrap().clone()
    }

    fn unsupported<T>(operation: &str) -> Result<T, AgentError> {
        Err(AgentError::CallFailed(format!("{} unsupported", operation)))
    }
}

#[async_trait]
impl AgentClient for SlowAgent {
    async fn connection_create(&self, _: String, _: Value) -> Result<Handle, AgentError> {
        let handle = FIRST_HANDLE + self.next_handle.fetch_add(1, Ordering::SeqCst);
        self.created.lock().unwrap().push(handle);

        tokio::time::sleep(self.delay).await;
        Ok(handle)
    }

    async fn connection_connect(&self, _: Handle, _: ConnectionType) -> Result<(), AgentError> {
        Ok(())
    }

    async fn connection_get_state(&self, _: Handle) -> Result<StatusCode, AgentError> {
        tokio::time::sleep(self.delay).await;
        Ok(4)
    }

    async fn connection_update_state(&self, _: Handle) -> Result<StatusCode, AgentError> {
        tokio::time::sleep(self.delay).await;
        Ok(4)
    }

    async fn connection_send_message(
        &self,
        _: Handle,
        _: String,
        _: MessageOptions,
    ) -> Result<String, AgentError> {
        Self::unsupported("connection_send_message")
    }

    async fn connection_release(&self, handle: Handle) -> Result<(), AgentError> {
        self.released.lock().unwrap().push(handle);
        Ok(())
    }

    async fn connection_serialize(&self, _: Handle) -> Result<String, AgentError> {
        Self::unsupported("connection_serialize")
    }

    async fn connection_deserialize(&self, _: String) -> Result<Handle, AgentError> {
        Self::unsupported("connection_deserialize")
    }

    async fn connection_get_pw_did(&self, _: Handle) -> Result<String, AgentError> {
        Self::unsupported("connection_get_pw_did")
    }

    async fn connection_get_their_pw_did(&self, _: Handle) -> Result<String, AgentError> {
        Self::unsupported("connection_get_their_pw_did")
    }

    async fn credential_get_offers(&self, _: Handle) -> Result<String, AgentError> {
        Ok("[]".to_string())
    }

    async fn credential_create_with_offer(&self, _: String, _: String) -> Result<Handle, AgentError> {
        Self::unsupported("credential_create_with_offer")
    }

    async fn credential_send_request(&self, _: Handle, _: Handle) -> Result<(), AgentError> {
        Self::unsupported("credential_send_request")
    }

    async fn credential_update_state_v2(&self, _: Handle, _: Handle) -> Result<StatusCode, AgentError> {
        Self::unsupported("credential_update_state_v2")
    }

    async fn get_credential(&self, _: Handle) -> Result<String, AgentError> {
        Self::unsupported("get_credential")
    }
}
