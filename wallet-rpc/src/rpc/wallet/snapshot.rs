use rst_common::with_logging::log::{info, warn};

use prople_wallet_core::connection::types::{ConnectionAPI, ConnectionEntityAccessor};
use prople_wallet_core::connection::Connection;

use crate::common::types::CommonError;

use super::types::SnapshotRepoBuilder;

/// `persist_all` exports every tracked connection and stores the snapshots
///
/// A connection that can't be exported keeps its previous snapshot, if any
pub async fn persist_all<TConnection, TRepo>(
    connection_api: &TConnection,
    repo: &TRepo,
) -> Result<usize, CommonError>
where
    TConnection: ConnectionAPI<EntityAccessor = Connection>,
    TRepo: SnapshotRepoBuilder,
{
    let connections = connection_api
        .list_connections()
        .await
        .map_err(|err| CommonError::InternalError(err.to_string()))?;

    let mut snapshots = Vec::new();
    for connection in connections {
        let id = connection.get_id();
        match connection_api.export_connection(id.clone()).await {
            Ok(snapshot) => snapshots.push(snapshot),
            Err(err) => {
                warn!("[snapshot] unable to export {}: {}", id, err);
                if let Ok(previous) = repo.get_snapshot(id).await {
                    snapshots.push(previous);
                }
            }
        }
    }

    let total = snapshots.len();
    repo.replace_snapshots(snapshots).await?;
    Ok(total)
}

/// `restore_all` rebuilds all stored connections, returns the number of restored connections
///
/// Each failed restoration is logged and skipped
pub async fn restore_all<TConnection, TRepo>(
    connection_api: &TConnection,
    repo: &TRepo,
) -> Result<usize, CommonError>
where
    TConnection: ConnectionAPI<EntityAccessor = Connection>,
    TRepo: SnapshotRepoBuilder,
{
    let snapshots = repo.list_snapshots().await?;

    let mut restored = 0;
    for snapshot in snapshots {
        let id = snapshot.id.clone();
        match connection_api.restore_connection(snapshot).await {
            Ok(connection) => {
                info!(
                    "[snapshot] restored {} with handle {}",
                    id,
                    connection.get_handle()
                );
                restored += 1;
            }
            Err(err) => warn!("[snapshot] unable to restore {}: {}", id, err),
        }
    }

    Ok(restored)
}
