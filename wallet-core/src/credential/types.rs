use std::fmt::Debug;

use rst_common::standard::async_trait::async_trait;
use rst_common::standard::chrono::{DateTime, Utc};
use rst_common::standard::serde::{self, Deserialize, Serialize};
use rst_common::standard::serde_json::Value;
use rst_common::with_errors::thiserror::{self, Error};

use rstdev_domain::entity::ToJSON;

use crate::agent::types::{AgentClient, AgentError};
use crate::connection::types::{ConnectionError, ConnectionID};
use crate::types::{
    FailureKind, Handle, MaterializedCredential, Status, StatusCode, SyncFailure,
    UnknownStatusCode,
};

/// CredentialError is a base error types for the `Credential` domain
#[derive(Debug, PartialEq, Error, Serialize, Deserialize, Clone)]
#[serde(crate = "self::serde")]
pub enum CredentialError {
    #[error("credential not found: {0}")]
    NotFound(Handle),

    #[error("invalid offer: {0}")]
    InvalidOffer(String),

    #[error("credential handle already tracked: {0}")]
    DuplicateHandle(Handle),

    #[error("agent call failed: {0}")]
    AgentCallFailed(String),

    #[error("agent call timeout: {0}")]
    AgentCallTimeout(String),

    #[error("unknown status code: {0}")]
    UnknownStatusCode(StatusCode),

    #[error("connection error: {0}")]
    ConnectionError(ConnectionError),

    #[error("entity error: {0}")]
    EntityError(String),
}

impl CredentialError {
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            CredentialError::NotFound(_) => FailureKind::NotFound,
            CredentialError::InvalidOffer(_) => FailureKind::InvalidOffer,
            CredentialError::AgentCallFailed(_) => FailureKind::AgentCallFailed,
            CredentialError::AgentCallTimeout(_) => FailureKind::AgentCallTimeout,
            CredentialError::UnknownStatusCode(_) => FailureKind::UnknownStatusCode,
            CredentialError::ConnectionError(err) => err.failure_kind(),
            _ => FailureKind::Internal,
        }
    }
}

impl From<AgentError> for CredentialError {
    fn from(value: AgentError) -> Self {
        match value {
            AgentError::Timeout(msg) => CredentialError::AgentCallTimeout(msg),
            AgentError::CallFailed(msg) | AgentError::InvalidResponse(msg) => {
                CredentialError::AgentCallFailed(msg)
            }
        }
    }
}

impl From<UnknownStatusCode> for CredentialError {
    fn from(value: UnknownStatusCode) -> Self {
        CredentialError::UnknownStatusCode(value.0)
    }
}

impl From<ConnectionError> for CredentialError {
    fn from(value: ConnectionError) -> Self {
        CredentialError::ConnectionError(value)
    }
}

/// `OfferFraming` decides how a single offer taken from the raw offers list
///
/// - [`OfferFraming::Structured`] parses the list as a JSON array and takes its first element
/// - [`OfferFraming::Legacy`] strips the first and the last characters of the raw text
///
/// The legacy framing only works when the list contains exactly one offer
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(crate = "self::serde")]
#[serde(rename_all = "lowercase")]
pub enum OfferFraming {
    #[default]
    Structured,
    Legacy,
}

/// `CredentialEntityAccessor` used to access main Credential entity property fields
pub trait CredentialEntityAccessor:
    Clone + Debug + Send + Sync + ToJSON + TryInto<Vec<u8>> + TryFrom<Vec<u8>>
{
    fn get_handle(&self) -> Handle;
    fn get_connection_handle(&self) -> Handle;
    fn get_connection_id(&self) -> ConnectionID;
    fn get_offer_id(&self) -> String;
    fn get_status(&self) -> Status;
    fn is_request_sent(&self) -> bool;
    fn is_materialized(&self) -> bool;
    fn get_payload(&self) -> Option<String>;
    fn get_created_at(&self) -> DateTime<Utc>;
    fn get_updated_at(&self) -> DateTime<Utc>;
}

/// `CredentialReport` is the outcome of a single credential processing pass
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(crate = "self::serde")]
pub struct CredentialReport {
    pub failures: Vec<SyncFailure>,
    pub materialized: Vec<MaterializedCredential>,
}

/// `RegistryBuilder` is the in-memory store of credentials and consumed offers
///
/// An offer is consumed once a credential has been created from it. A consumed offer
/// stays consumed until its connection is forgotten, even when the credential itself
/// has been evicted
#[async_trait]
pub trait RegistryBuilder: Clone + Send + Sync {
    type EntityAccessor: CredentialEntityAccessor;

    async fn track(&self, credential: Self::EntityAccessor) -> Result<(), CredentialError>;
    async fn get(&self, handle: Handle) -> Result<Self::EntityAccessor, CredentialError>;
    async fn update(&self, credential: Self::EntityAccessor) -> Result<(), CredentialError>;
    async fn list(&self) -> Result<Vec<Self::EntityAccessor>, CredentialError>;

    async fn is_offer_consumed(&self, connection_handle: Handle, offer_id: String) -> bool;

    async fn remove_by_connection(
        &self,
        connection_handle: Handle,
    ) -> Result<Vec<Self::EntityAccessor>, CredentialError>;

    async fn evict_materialized(&self) -> Result<Vec<Self::EntityAccessor>, CredentialError>;
}

pub trait UsecaseBuilder<TEntityAccessor>: CredentialAPI<EntityAccessor = TEntityAccessor>
where
    TEntityAccessor: CredentialEntityAccessor,
{
    type AgentImplementer: AgentClient;
    type RegistryImplementer: RegistryBuilder<EntityAccessor = TEntityAccessor>;

    fn agent(&self) -> &Self::AgentImplementer;
    fn registry(&self) -> Self::RegistryImplementer;
}

/// CredentialAPI is main entrypoint to communicate with the `Credential` domain
#[async_trait]
pub trait CredentialAPI: Clone + Send + Sync {
    type EntityAccessor: CredentialEntityAccessor;

    /// `process` runs one full issuance pass:
    ///
    /// - collect offers for each tracked connection
    /// - create a credential for each new offer and send its request
    /// - refresh each pending credential status
    /// - fetch the final credential once it is accepted
    ///
    /// Each failure is isolated and collected into the [`CredentialReport`]
    async fn process(&self) -> CredentialReport;

    /// `collect_offers` covers the first half of [`CredentialAPI::process`], it only
    /// consumes new offers
    async fn collect_offers(&self) -> Vec<SyncFailure>;

    /// `refresh_credentials` covers the second half of [`CredentialAPI::process`]
    async fn refresh_credentials(&self) -> CredentialReport;

    async fn get_credential(&self, handle: Handle)
        -> Result<Self::EntityAccessor, CredentialError>;

    async fn list_credentials(&self) -> Result<Vec<Self::EntityAccessor>, CredentialError>;

    /// `list_offers` reads the pending offers of a connection without consuming them
    async fn list_offers(&self, connection_id: ConnectionID) -> Result<Vec<Value>, CredentialError>;

    /// `forget_connection` drops every credential and consumed offer owned by the given connection
    async fn forget_connection(
        &self,
        connection_handle: Handle,
    ) -> Result<Vec<Self::EntityAccessor>, CredentialError>;

    async fn evict_materialized(&self) -> Result<Vec<Self::EntityAccessor>, CredentialError>;
}
