use rst_common::standard::async_trait::async_trait;

use prople_wallet_core::connection::types::{ConnectionID, ConnectionSnapshot};

use crate::common::types::CommonError;

/// `SnapshotRepoBuilder` persists the [`ConnectionSnapshot`] of all tracked connections so
/// they can be rebuilt after the daemon restarts
#[async_trait]
pub trait SnapshotRepoBuilder: Clone + Send + Sync {
    async fn save_snapshot(&self, snapshot: &ConnectionSnapshot) -> Result<(), CommonError>;
    async fn get_snapshot(&self, id: ConnectionID) -> Result<ConnectionSnapshot, CommonError>;
    async fn list_snapshots(&self) -> Result<Vec<ConnectionSnapshot>, CommonError>;

    /// `replace_snapshots` saves the given snapshots and drops any stored snapshot missing
    /// from it
    async fn replace_snapshots(&self, snapshots: Vec<ConnectionSnapshot>)
        -> Result<(), CommonError>;
}
