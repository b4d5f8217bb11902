use rst_common::standard::async_trait::async_trait;
use rst_common::standard::serde_json;

use rstdev_storage::engine::rocksdb::executor::Executor;
use rstdev_storage::engine::rocksdb::types::{
    Instruction as DbInstruction, OutputOpts as DbOutput,
};

use prople_wallet_core::connection::types::{ConnectionID, ConnectionSnapshot};

use crate::common::types::CommonError;

use super::types::SnapshotRepoBuilder;

const SNAPSHOT_KEY_CONNECTION: &str = "connection";
const SNAPSHOT_KEY_INDEX: &str = "connection_ids";
const DEFAULT_NAMESPACE: &str = "wallet";

#[derive(Clone)]
pub struct Repository {
    db: Executor,
    namespace: String,
}

impl Repository {
    pub fn new(db: Executor) -> Self {
        Self::with_namespace(db, DEFAULT_NAMESPACE)
    }

    pub fn with_namespace(db: Executor, namespace: &str) -> Self {
        Self {
            db,
            namespace: namespace.to_string(),
        }
    }

    fn build_snapshot_key(&self, id: &ConnectionID) -> String {
        format!("{}:{}:{}", self.namespace, SNAPSHOT_KEY_CONNECTION, id)
    }

    fn build_index_key(&self) -> String {
        format!("{}:{}", self.namespace, SNAPSHOT_KEY_INDEX)
    }

    async fn get_bytes(&self, key: String) -> Result<Option<Vec<u8>>, CommonError> {
        let output = self
            .db
            .exec(DbInstruction::GetCf { key })
            .await
            .map_err(|err| CommonError::DbError(err.to_string()))?;

        match output {
            DbOutput::SingleByte { value } => Ok(value),
            _ => Err(CommonError::DbError("unknown output type".to_string())),
        }
    }

    async fn save_bytes(&self, key: String, value: Vec<u8>) -> Result<(), CommonError> {
        let _ = self
            .db
            .exec(DbInstruction::SaveCf { key, value })
            .await
            .map_err(|err| CommonError::DbError(err.to_string()))?;

        Ok(())
    }

    async fn remove_key(&self, key: String) -> Result<(), CommonError> {
        let _ = self
            .db
            .exec(DbInstruction::RemoveCf { key })
            .await
            .map_err(|err| CommonError::DbError(err.to_string()))?;

        Ok(())
    }

    async fn get_index(&self) -> Result<Vec<ConnectionID>, CommonError> {
        match self.get_bytes(self.build_index_key()).await? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map_err(|err| CommonError::JSONError(err.to_string())),
            None => Ok(Vec::new()),
        }
    }

    async fn save_index(&self, ids: &[ConnectionID]) -> Result<(), CommonError> {
        let bytes =
            serde_json::to_vec(ids).map_err(|err| CommonError::JSONError(err.to_string()))?;
        self.save_bytes(self.build_index_key(), bytes).await
    }

    async fn put_snapshot(&self, snapshot: &ConnectionSnapshot) -> Result<(), CommonError> {
        let bytes =
            serde_json::to_vec(snapshot).map_err(|err| CommonError::JSONError(err.to_string()))?;
        self.save_bytes(self.build_snapshot_key(&snapshot.id), bytes)
            .await
    }
}

#[async_trait]
impl SnapshotRepoBuilder for Repository {
    async fn save_snapshot(&self, snapshot: &ConnectionSnapshot) -> Result<(), CommonError> {
        self.put_snapshot(snapshot).await?;

        let mut ids = self.get_index().await?;
        if !ids.contains(&snapshot.id) {
            ids.push(snapshot.id.clone());
            self.save_index(&ids).await?;
        }

        Ok(())
    }

    async fn get_snapshot(&self, id: ConnectionID) -> Result<ConnectionSnapshot, CommonError> {
        let bytes = self
            .get_bytes(self.build_snapshot_key(&id))
            .await?
            .ok_or(CommonError::DbError(format!("snapshot missing: {}", id)))?;

        serde_json::from_slice(&bytes).map_err(|err| CommonError::JSONError(err.to_string()))
    }

    async fn list_snapshots(&self) -> Result<Vec<ConnectionSnapshot>, CommonError> {
        let mut snapshots = Vec::new();
        for id in self.get_index().await? {
            snapshots.push(self.get_snapshot(id).await?);
        }

        Ok(snapshots)
    }

    async fn replace_snapshots(
        &self,
        snapshots: Vec<ConnectionSnapshot>,
    ) -> Result<(), CommonError> {
        let ids = snapshots
            .iter()
            .map(|snapshot| snapshot.id.clone())
            .collect::<Vec<ConnectionID>>();

        for snapshot in snapshots.iter() {
            self.put_snapshot(snapshot).await?;
        }

        for stale in self.get_index().await? {
            if !ids.contains(&stale) {
                self.remove_key(self.build_snapshot_key(&stale)).await?;
            }
        }

        self.save_index(&ids).await
    }
}
