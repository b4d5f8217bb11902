use std::fmt::Debug;

use rst_common::standard::async_trait::async_trait;
use rst_common::standard::chrono::serde::ts_seconds;
use rst_common::standard::chrono::{DateTime, Utc};
use rst_common::standard::serde::{self, Deserialize, Serialize};
use rst_common::standard::serde_json::Value;
use rst_common::with_errors::thiserror::{self, Error};

use derive_more::{AsRef, Display, From, Into};

use rstdev_domain::entity::ToJSON;

use crate::agent::types::{AgentClient, AgentError};
use crate::types::{FailureKind, Handle, Status, StatusCode, SyncFailure, UnknownStatusCode};

/// ConnectionError is a base error types for the `Connection` domain
///
/// It will contains any possible errors for the `connection`
#[derive(Debug, PartialEq, Error, Serialize, Deserialize, Clone)]
#[serde(crate = "self::serde")]
pub enum ConnectionError {
    #[error("invalid invitation: {0}")]
    InvalidInvitation(String),

    #[error("duplicate invitation: {0}")]
    DuplicateInvitation(String),

    #[error("connection not found: {0}")]
    NotFound(String),

    #[error("handle already used by another connection: {0}")]
    HandleConflict(Handle),

    #[error("agent call failed: {0}")]
    AgentCallFailed(String),

    #[error("agent call timeout: {0}")]
    AgentCallTimeout(String),

    #[error("unknown status code: {0}")]
    UnknownStatusCode(StatusCode),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("entity error: {0}")]
    EntityError(String),
}

impl ConnectionError {
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            ConnectionError::AgentCallFailed(_) => FailureKind::AgentCallFailed,
            ConnectionError::AgentCallTimeout(_) => FailureKind::AgentCallTimeout,
            ConnectionError::UnknownStatusCode(_) => FailureKind::UnknownStatusCode,
            ConnectionError::NotFound(_) => FailureKind::NotFound,
            _ => FailureKind::Internal,
        }
    }
}

impl From<AgentError> for ConnectionError {
    fn from(value: AgentError) -> Self {
        match value {
            AgentError::Timeout(msg) => ConnectionError::AgentCallTimeout(msg),
            AgentError::CallFailed(msg) | AgentError::InvalidResponse(msg) => {
                ConnectionError::AgentCallFailed(msg)
            }
        }
    }
}

impl From<UnknownStatusCode> for ConnectionError {
    fn from(value: UnknownStatusCode) -> Self {
        ConnectionError::UnknownStatusCode(value.0)
    }
}

/// `ConnectionID` is the invitation identifier, taken from the invitation `@id` property
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, AsRef, From, Into, Display,
)]
#[serde(crate = "self::serde")]
pub struct ConnectionID(String);

impl ConnectionID {
    pub fn new(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ConnectionID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// `RefreshMode` choose which agent operation used to refresh a connection status
///
/// - [`RefreshMode::Update`] asks the agent runtime to progress the protocol first
/// - [`RefreshMode::Get`] only reads the latest known status
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(crate = "self::serde")]
#[serde(rename_all = "lowercase")]
pub enum RefreshMode {
    #[default]
    Update,
    Get,
}

/// `ConnectionEntityAccessor` it's a special trait used to access main Connection entity
/// property fields.
///
/// We need to protect the properties from direct access or manipulation from outside,
/// the status and selection flag can only be changed through the registry
pub trait ConnectionEntityAccessor:
    Clone + Debug + Send + Sync + ToJSON + TryInto<Vec<u8>> + TryFrom<Vec<u8>>
{
    fn get_id(&self) -> ConnectionID;
    fn get_handle(&self) -> Handle;
    fn get_status(&self) -> Status;
    fn get_invite_details(&self) -> Value;
    fn is_selected(&self) -> bool;
    fn get_created_at(&self) -> DateTime<Utc>;
    fn get_updated_at(&self) -> DateTime<Utc>;
}

/// `PairwiseInfo` exposes both pairwise DIDs owned by a connection
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(crate = "self::serde")]
pub struct PairwiseInfo {
    pub id: ConnectionID,
    pub pw_did: String,
    pub their_pw_did: String,
}

/// `ConnectionSnapshot` is the portable form of a connection
///
/// The `serialized` property is an opaque value produced by the agent runtime, it is the only
/// way to rebuild the session object and get a fresh [`Handle`] after a restart
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(crate = "self::serde")]
pub struct ConnectionSnapshot {
    pub id: ConnectionID,
    pub status: Status,
    pub invite_details: Value,
    pub selected: bool,
    pub serialized: String,

    #[serde(with = "ts_seconds")]
    pub created_at: DateTime<Utc>,
}

/// `RegistryBuilder` is the in-memory store of all tracked connections
///
/// Implementer must keep the identifiers and the handles unique
#[async_trait]
pub trait RegistryBuilder: Clone + Send + Sync {
    type EntityAccessor: ConnectionEntityAccessor;

    async fn upsert(&self, connection: Self::EntityAccessor) -> Result<(), ConnectionError>;

    /// `insert` only tracks a connection whose identifier is still vacant, an occupied
    /// identifier fails with [`ConnectionError::DuplicateInvitation`]
    async fn insert(&self, connection: Self::EntityAccessor) -> Result<(), ConnectionError>;
    async fn get(&self, id: ConnectionID) -> Result<Self::EntityAccessor, ConnectionError>;
    async fn contains(&self, id: ConnectionID) -> bool;
    async fn list(&self) -> Result<Vec<Self::EntityAccessor>, ConnectionError>;

    async fn toggle_selected(
        &self,
        id: ConnectionID,
    ) -> Result<Self::EntityAccessor, ConnectionError>;

    async fn update_status(
        &self,
        id: ConnectionID,
        status: Status,
    ) -> Result<Self::EntityAccessor, ConnectionError>;

    async fn remove(&self, id: ConnectionID) -> Result<Self::EntityAccessor, ConnectionError>;
}

pub trait UsecaseBuilder<TEntityAccessor>: ConnectionAPI<EntityAccessor = TEntityAccessor>
where
    TEntityAccessor: ConnectionEntityAccessor,
{
    type AgentImplementer: AgentClient;
    type RegistryImplementer: RegistryBuilder<EntityAccessor = TEntityAccessor>;

    fn agent(&self) -> &Self::AgentImplementer;
    fn registry(&self) -> Self::RegistryImplementer;
}

/// ConnectionAPI is main entrypoint to communicate with the `Connection` domain
#[async_trait]
pub trait ConnectionAPI: Clone + Send + Sync {
    type EntityAccessor: ConnectionEntityAccessor;

    /// `create_from_invitation` parses the raw invitation text and asks the agent runtime
    /// to create the connection session object
    ///
    /// Nothing will be saved when the invitation is invalid, already tracked or when the
    /// agent call failed. A fresh connection always starts at [`Status::Initialized`]
    async fn create_from_invitation(
        &self,
        invitation: String,
    ) -> Result<Self::EntityAccessor, ConnectionError>;

    /// `advance_one` asks the agent runtime to connect to the inviter, but only for
    /// a connection that still [`Status::Initialized`]. Any other status is a no-op
    async fn advance_one(&self, id: ConnectionID) -> Result<(), ConnectionError>;

    /// `refresh_status` overwrites the connection status with the status reported by the
    /// agent runtime. The selection flag is kept as is
    async fn refresh_status(
        &self,
        id: ConnectionID,
        mode: RefreshMode,
    ) -> Result<Self::EntityAccessor, ConnectionError>;

    /// `sync_all` refreshes and advances all tracked connections concurrently
    ///
    /// A failed connection never blocks the others, each failure will be collected
    async fn sync_all(&self) -> Vec<SyncFailure>;

    async fn get_connection(&self, id: ConnectionID)
        -> Result<Self::EntityAccessor, ConnectionError>;

    async fn list_connections(&self) -> Result<Vec<Self::EntityAccessor>, ConnectionError>;

    async fn toggle_selected(
        &self,
        id: ConnectionID,
    ) -> Result<Self::EntityAccessor, ConnectionError>;

    /// `send_message` sends a basic message through the connection and returns the
    /// message id given by the agent runtime
    async fn send_message(
        &self,
        id: ConnectionID,
        message: String,
    ) -> Result<String, ConnectionError>;

    /// `release` frees the agent session object and stop tracking the connection
    async fn release(&self, id: ConnectionID) -> Result<Self::EntityAccessor, ConnectionError>;

    async fn pairwise_info(&self, id: ConnectionID) -> Result<PairwiseInfo, ConnectionError>;

    async fn export_connection(
        &self,
        id: ConnectionID,
    ) -> Result<ConnectionSnapshot, ConnectionError>;

    /// `restore_connection` rebuilds a connection from its [`ConnectionSnapshot`], the
    /// agent runtime will give a new handle for it
    async fn restore_connection(
        &self,
        snapshot: ConnectionSnapshot,
    ) -> Result<Self::EntityAccessor, ConnectionError>;
}
