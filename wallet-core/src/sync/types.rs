use rst_common::standard::async_trait::async_trait;
use rst_common::standard::serde::{self, Deserialize, Serialize};
use rst_common::with_errors::thiserror::{self, Error};

use crate::connection::types::{
    ConnectionEntityAccessor, ConnectionError, ConnectionID, RefreshMode,
};
use crate::credential::types::CredentialError;
use crate::types::{MaterializedCredential, SyncFailure};

#[derive(Debug, PartialEq, Error, Serialize, Deserialize, Clone)]
#[serde(crate = "self::serde")]
pub enum SyncError {
    #[error("another synchronization pass still in progress")]
    TickInProgress,

    #[error("connection error: {0}")]
    ConnectionError(ConnectionError),

    #[error("credential error: {0}")]
    CredentialError(CredentialError),
}

impl From<ConnectionError> for SyncError {
    fn from(value: ConnectionError) -> Self {
        SyncError::ConnectionError(value)
    }
}

impl From<CredentialError> for SyncError {
    fn from(value: CredentialError) -> Self {
        SyncError::CredentialError(value)
    }
}

/// `SyncReport` is the outcome of a single [`SyncAPI::tick`]
///
/// `evicted` counts the materialized credentials removed from memory at the end of the pass
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(crate = "self::serde")]
pub struct SyncReport {
    pub failures: Vec<SyncFailure>,
    pub materialized: Vec<MaterializedCredential>,
    pub evicted: usize,
}

impl SyncReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// SyncAPI is the single entrypoint used by the host to drive both state machines
#[async_trait]
pub trait SyncAPI: Clone + Send + Sync {
    type EntityAccessor: ConnectionEntityAccessor;

    /// `tick` runs one full synchronization pass, connections first and then credentials
    ///
    /// Only one pass may run at a time, a concurrent call will be rejected with
    /// [`SyncError::TickInProgress`] instead of waiting
    async fn tick(&self) -> Result<SyncReport, SyncError>;

    /// `release_connection` releases a connection and forgets all of its credentials
    ///
    /// It waits until the running pass, if any, is finished
    async fn release_connection(
        &self,
        id: ConnectionID,
    ) -> Result<Self::EntityAccessor, SyncError>;

    /// `refresh_connection` refreshes a single connection status outside of a pass
    ///
    /// Like [`SyncAPI::release_connection`], it waits until the running pass is finished
    async fn refresh_connection(
        &self,
        id: ConnectionID,
        mode: RefreshMode,
    ) -> Result<Self::EntityAccessor, SyncError>;
}
