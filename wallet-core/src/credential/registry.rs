use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use rst_common::standard::async_trait::async_trait;
use rst_common::with_tokio::tokio::sync::RwLock;

use crate::types::Handle;

use super::credential::Credential;
use super::types::{CredentialEntityAccessor, CredentialError, RegistryBuilder};

#[derive(Default)]
struct Store {
    credentials: BTreeMap<Handle, Credential>,
    consumed_offers: HashSet<(Handle, String)>,
}

/// `Registry` is the in-memory [`RegistryBuilder`] implementation, it shares its storage between clones
#[derive(Clone, Default)]
pub struct Registry {
    store: Arc<RwLock<Store>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RegistryBuilder for Registry {
    type EntityAccessor = Credential;

    async fn track(&self, credential: Credential) -> Result<(), CredentialError> {
        let mut store = self.store.write().await;
        if store.credentials.contains_key(&credential.get_handle()) {
            return Err(CredentialError::DuplicateHandle(credential.get_handle()));
        }

        store
            .consumed_offers
            .insert((credential.get_connection_handle(), credential.get_offer_id()));

        store
            .credentials
            .insert(credential.get_handle(), credential);

        Ok(())
    }

    async fn get(&self, handle: Handle) -> Result<Credential, CredentialError> {
        let store = self.store.read().await;
        store
            .credentials
            .get(&handle)
            .cloned()
            .ok_or(CredentialError::NotFound(handle))
    }

    async fn update(&self, credential: Credential) -> Result<(), CredentialError> {
        let mut store = self.store.write().await;
        let current = store
            .credentials
            .get_mut(&credential.get_handle())
            .ok_or(CredentialError::NotFound(credential.get_handle()))?;

        *current = credential;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Credential>, CredentialError> {
        let store = self.store.read().await;
        Ok(store.credentials.values().cloned().collect())
    }

    async fn is_offer_consumed(&self, connection_handle: Handle, offer_id: String) -> bool {
        let store = self.store.read().await;
        store
            .consumed_offers
            .contains(&(connection_handle, offer_id))
    }

    async fn remove_by_connection(
        &self,
        connection_handle: Handle,
    ) -> Result<Vec<Credential>, CredentialError> {
        let mut store = self.store.write().await;
        store
            .consumed_offers
            .retain(|(handle, _)| *handle != connection_handle);

        let handles: Vec<Handle> = store
            .credentials
            .values()
            .filter(|credential| credential.get_connection_handle() == connection_handle)
            .map(|credential| credential.get_handle())
            .collect();

        Ok(handles
            .iter()
            .filter_map(|handle| store.credentials.remove(handle))
            .collect())
    }

    async fn evict_materialized(&self) -> Result<Vec<Credential>, CredentialError> {
        let mut store = self.store.write().await;
        let handles: Vec<Handle> = store
            .credentials
            .values()
            .filter(|credential| credential.is_materialized())
            .map(|credential| credential.get_handle())
            .collect();

        Ok(handles
            .iter()
            .filter_map(|handle| store.credentials.remove(handle))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rst_common::with_tokio::tokio;

    use crate::connection::types::ConnectionID;

    fn build_credential(handle: Handle, connection_handle: Handle, offer_id: &str) -> Credential {
        Credential::new(
            handle,
            connection_handle,
            ConnectionID::from("abc123"),
            offer_id.to_string(),
        )
    }

    #[tokio::test]
    async fn test_track_consume_offer() {
        let registry = Registry::new();
        let tracked = registry.track(build_credential(21, 7, "offer-1")).await;
        assert!(!tracked.is_err());

        assert!(registry.is_offer_consumed(7, "offer-1".to_string()).await);
        assert!(!registry.is_offer_consumed(8, "offer-1".to_string()).await);
        assert!(!registry.is_offer_consumed(7, "offer-2".to_string()).await)
    }

    #[tokio::test]
    async fn test_track_duplicate_handle() {
        let registry = Registry::new();
        let _ = registry.track(build_credential(21, 7, "offer-1")).await;

        let tracked = registry.track(build_credential(21, 7, "offer-2")).await;
        assert_eq!(tracked.unwrap_err(), CredentialError::DuplicateHandle(21))
    }

    #[tokio::test]
    async fn test_update_missing() {
        let registry = Registry::new();
        let updated = registry.update(build_credential(21, 7, "offer-1")).await;
        assert_eq!(updated.unwrap_err(), CredentialError::NotFound(21))
    }

    #[tokio::test]
    async fn test_remove_by_connection() {
        let registry = Registry::new();
        let _ = registry.track(build_credential(21, 7, "offer-1")).await;
        let _ = registry.track(build_credential(22, 7, "offer-2")).await;
        let _ = registry.track(build_credential(23, 8, "offer-3")).await;

        let removed = registry.remove_by_connection(7).await.unwrap();
        assert_eq!(removed.len(), 2);

        let listed = registry.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].get_handle(), 23);
        assert!(!registry.is_offer_consumed(7, "offer-1".to_string()).await)
    }

    #[tokio::test]
    async fn test_evict_materialized_keep_consumed_offer() {
        let registry = Registry::new();
        let mut credential = build_credential(21, 7, "offer-1");
        let _ = registry.track(credential.clone()).await;
        let _ = registry.track(build_credential(22, 7, "offer-2")).await;

        credential.materialize("{}".to_string());
        let _ = registry.update(credential).await;

        let evicted = registry.evict_materialized().await.unwrap();
        assert_eq!(evicted.len(), 1);
        assert_eq!(evicted[0].get_handle(), 21);

        assert!(registry.get(21).await.is_err());
        assert!(registry.is_offer_consumed(7, "offer-1".to_string()).await)
    }
}
