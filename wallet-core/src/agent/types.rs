use rst_common::standard::async_trait::async_trait;
use rst_common::standard::serde::{self, Deserialize, Serialize};
use rst_common::standard::serde_json::Value;
use rst_common::with_errors::thiserror::{self, Error};

use crate::types::{Handle, StatusCode};

/// AgentError is a base error types for any calls to the agent runtime
#[derive(Debug, PartialEq, Error, Serialize, Deserialize, Clone)]
#[serde(crate = "self::serde")]
pub enum AgentError {
    #[error("agent call failed: {0}")]
    CallFailed(String),

    #[error("agent call timeout: {0}")]
    Timeout(String),

    #[error("invalid agent response: {0}")]
    InvalidResponse(String),
}

/// `ConnectionType` is the payload given to the agent runtime when we're trying to
/// connect to the inviter
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(crate = "self::serde")]
pub struct ConnectionType {
    pub use_public_did: bool,
}

/// `MessageOptions` used when sending a basic message through an established connection
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(crate = "self::serde")]
pub struct MessageOptions {
    pub msg_type: String,
    pub msg_title: String,
    pub ref_msg_id: Option<String>,
}

impl Default for MessageOptions {
    fn default() -> Self {
        Self {
            msg_type: String::from("basic"),
            msg_title: String::from("message"),
            ref_msg_id: None,
        }
    }
}

/// `AgentClient` is the boundary to the agent runtime which holds every cryptographic
/// session object. The wallet only keeps the [`Handle`] values it returns.
///
/// All of these methods are expected to be non-blocking network or IPC operations,
/// any of them may fail or never answer at all
#[async_trait]
pub trait AgentClient: Clone + Send + Sync {
    async fn connection_create(
        &self,
        invite_id: String,
        invite_details: Value,
    ) -> Result<Handle, AgentError>;

    async fn connection_connect(
        &self,
        handle: Handle,
        connection_type: ConnectionType,
    ) -> Result<(), AgentError>;

    async fn connection_get_state(&self, handle: Handle) -> Result<StatusCode, AgentError>;

    /// same as `connection_get_state` but also nudges the protocol state on the remote side
    async fn connection_update_state(&self, handle: Handle) -> Result<StatusCode, AgentError>;

    async fn connection_send_message(
        &self,
        handle: Handle,
        message: String,
        options: MessageOptions,
    ) -> Result<String, AgentError>;

    async fn connection_release(&self, handle: Handle) -> Result<(), AgentError>;

    async fn connection_serialize(&self, handle: Handle) -> Result<String, AgentError>;

    async fn connection_deserialize(&self, serialized: String) -> Result<Handle, AgentError>;

    async fn connection_get_pw_did(&self, handle: Handle) -> Result<String, AgentError>;

    async fn connection_get_their_pw_did(&self, handle: Handle) -> Result<String, AgentError>;

    /// returns the offers list as a raw JSON array text
    async fn credential_get_offers(&self, handle: Handle) -> Result<String, AgentError>;

    async fn credential_create_with_offer(
        &self,
        source_id: String,
        offer: String,
    ) -> Result<Handle, AgentError>;

    async fn credential_send_request(
        &self,
        credential_handle: Handle,
        connection_handle: Handle,
    ) -> Result<(), AgentError>;

    async fn credential_update_state_v2(
        &self,
        credential_handle: Handle,
        connection_handle: Handle,
    ) -> Result<StatusCode, AgentError>;

    async fn get_credential(&self, credential_handle: Handle) -> Result<String, AgentError>;
}
