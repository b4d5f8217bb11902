use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::Arc;

use rst_common::standard::async_trait::async_trait;
use rst_common::with_tokio::tokio::sync::RwLock;

use crate::types::Status;

use super::connection::Connection;
use super::types::{ConnectionError, ConnectionID, RegistryBuilder};

/// `Registry` is the in-memory [`RegistryBuilder`] implementation
///
/// Connections are ordered by their identifier, which keeps the listing stable between calls.
/// Cloning a `Registry` shares the same underlying storage
#[derive(Clone, Default)]
pub struct Registry {
    connections: Arc<RwLock<BTreeMap<ConnectionID, Connection>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    fn not_found(id: &ConnectionID) -> ConnectionError {
        ConnectionError::NotFound(id.to_string())
    }
}

#[async_trait]
impl RegistryBuilder for Registry {
    type EntityAccessor = Connection;

    async fn upsert(&self, connection: Connection) -> Result<(), ConnectionError> {
        let mut connections = self.connections.write().await;

        let conflicted = connections
            .values()
            .any(|current| current.handle == connection.handle && current.id != connection.id);

        if conflicted {
            return Err(ConnectionError::HandleConflict(connection.handle));
        }

        connections.insert(connection.id.clone(), connection);
        Ok(())
    }

    async fn insert(&self, connection: Connection) -> Result<(), ConnectionError> {
        let mut connections = self.connections.write().await;
        let handle = connection.handle;
        let conflicted = connections.values().any(|current| current.handle == handle);

        match connections.entry(connection.id.clone()) {
            Entry::Occupied(_) => Err(ConnectionError::DuplicateInvitation(
                connection.id.to_string(),
            )),
            Entry::Vacant(_) if conflicted => Err(ConnectionError::HandleConflict(handle)),
            Entry::Vacant(slot) => {
                slot.insert(connection);
                Ok(())
            }
        }
    }

    async fn get(&self, id: ConnectionID) -> Result<Connection, ConnectionError> {
        let connections = self.connections.read().await;
        connections
            .get(&id)
            .cloned()
            .ok_or_else(|| Self::not_found(&id))
    }

    async fn contains(&self, id: ConnectionID) -> bool {
        self.connections.read().await.contains_key(&id)
    }

    async fn list(&self) -> Result<Vec<Connection>, ConnectionError> {
        let connections = self.connections.read().await;
        Ok(connections.values().cloned().collect())
    }

    async fn toggle_selected(&self, id: ConnectionID) -> Result<Connection, ConnectionError> {
        let mut connections = self.connections.write().await;
        let connection = connections
            .get_mut(&id)
            .ok_or_else(|| Self::not_found(&id))?;

        connection.toggle_selected();
        Ok(connection.clone())
    }

    async fn update_status(
        &self,
        id: ConnectionID,
        status: Status,
    ) -> Result<Connection, ConnectionError> {
        let mut connections = self.connections.write().await;
        let connection = connections
            .get_mut(&id)
            .ok_or_else(|| Self::not_found(&id))?;

        connection.update_status(status);
        Ok(connection.clone())
    }

    async fn remove(&self, id: ConnectionID) -> Result<Connection, ConnectionError> {
        let mut connections = self.connections.write().await;
        connections.remove(&id).ok_or_else(|| Self::not_found(&id))
    }
}
