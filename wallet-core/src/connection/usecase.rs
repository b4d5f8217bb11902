use std::sync::Arc;

use rst_common::standard::async_trait::async_trait;
use rst_common::with_logging::log::{debug, info, warn};
use rst_common::with_tokio::tokio::task::JoinSet;

use crate::agent::types::{AgentClient, ConnectionType, MessageOptions};
use crate::sync::tasks::drain;
use crate::types::{EntityRef, Status, SyncFailure};

use super::connection::Connection;
use super::invitation::Invitation;
use super::types::{
    ConnectionAPI, ConnectionEntityAccessor, ConnectionError, ConnectionID, ConnectionSnapshot,
    PairwiseInfo, RefreshMode, RegistryBuilder, UsecaseBuilder,
};

/// `Usecase` is base logic implementation for the [`ConnectionAPI`]
///
/// This object depends on the implementation of [`AgentClient`] and [`RegistryBuilder`]
#[derive(Clone)]
pub struct Usecase<TAgent, TRegistry>
where
    TAgent: AgentClient,
    TRegistry: RegistryBuilder<EntityAccessor = Connection>,
{
    agent: Arc<TAgent>,
    registry: TRegistry,
    refresh_mode: RefreshMode,
}

impl<TAgent, TRegistry> Usecase<TAgent, TRegistry>
where
    TAgent: AgentClient + 'static,
    TRegistry: RegistryBuilder<EntityAccessor = Connection> + 'static,
{
    pub fn new(agent: TAgent, registry: TRegistry) -> Self {
        Self {
            agent: Arc::new(agent),
            registry,
            refresh_mode: RefreshMode::default(),
        }
    }

    /// `with_refresh_mode` overrides the mode used by [`ConnectionAPI::sync_all`]
    pub fn with_refresh_mode(mut self, mode: RefreshMode) -> Self {
        self.refresh_mode = mode;
        self
    }

    async fn sync_one(&self, id: ConnectionID) -> Result<(), ConnectionError> {
        let connection = self.refresh_status(id.clone(), self.refresh_mode).await?;
        if connection.get_status() == Status::Initialized {
            self.advance_one(id).await?;
        }

        Ok(())
    }

    /// `track` registers a connection whose handle was just given by the agent
    ///
    /// When another caller already tracked the same identifier, the fresh handle is released
    /// so the agent does not keep an orphaned connection
    async fn track(&self, connection: Connection) -> Result<Connection, ConnectionError> {
        let handle = connection.get_handle();
        if let Err(err) = self.registry().insert(connection.clone()).await {
            warn!(
                "[connection] unable to track {} with handle {}: {}",
                connection.get_id(),
                handle,
                err
            );

            if let Err(release_err) = self.agent().connection_release(handle).await {
                warn!(
                    "[connection] unable to release orphaned handle {}: {}",
                    handle, release_err
                );
            }

            return Err(err);
        }

        Ok(connection)
    }
}

impl<TAgent, TRegistry> UsecaseBuilder<Connection> for Usecase<TAgent, TRegistry>
where
    TAgent: AgentClient + 'static,
    TRegistry: RegistryBuilder<EntityAccessor = Connection> + 'static,
{
    type AgentImplementer = TAgent;
    type RegistryImplementer = TRegistry;

    fn agent(&self) -> &Self::AgentImplementer {
        &self.agent
    }

    fn registry(&self) -> Self::RegistryImplementer {
        self.registry.clone()
    }
}

#[async_trait]
impl<TAgent, TRegistry> ConnectionAPI for Usecase<TAgent, TRegistry>
where
    TAgent: AgentClient + 'static,
    TRegistry: RegistryBuilder<EntityAccessor = Connection> + 'static,
{
    type EntityAccessor = Connection;

    async fn create_from_invitation(
        &self,
        invitation: String,
    ) -> Result<Self::EntityAccessor, ConnectionError> {
        let invitation = Invitation::parse(&invitation)?;
        let id = invitation.id();

        if self.registry().contains(id.clone()).await {
            return Err(ConnectionError::DuplicateInvitation(id.to_string()));
        }

        let handle = self
            .agent()
            .connection_create(id.to_string(), invitation.details())
            .await?;

        let connection = self
            .track(Connection::new(id, handle, invitation.details()))
            .await?;

        info!(
            "[connection] created connection: {} with handle: {}",
            connection.get_id(),
            handle
        );
        Ok(connection)
    }

    async fn advance_one(&self, id: ConnectionID) -> Result<(), ConnectionError> {
        let connection = self.registry().get(id).await?;
        if connection.get_status() != Status::Initialized {
            debug!(
                "[connection] skip advancing {}, current status: {}",
                connection.get_id(),
                connection.get_status().description()
            );
            return Ok(());
        }

        self.agent()
            .connection_connect(connection.get_handle(), ConnectionType::default())
            .await?;

        debug!("[connection] connect requested for: {}", connection.get_id());
        Ok(())
    }

    async fn refresh_status(
        &self,
        id: ConnectionID,
        mode: RefreshMode,
    ) -> Result<Self::EntityAccessor, ConnectionError> {
        let connection = self.registry().get(id.clone()).await?;
        let handle = connection.get_handle();

        let code = match mode {
            RefreshMode::Update => self.agent().connection_update_state(handle).await?,
            RefreshMode::Get => self.agent().connection_get_state(handle).await?,
        };

        let status = Status::try_from(code)?;
        if status != connection.get_status() {
            info!(
                "[connection] {} status changed: {} -> {}",
                id,
                connection.get_status().description(),
                status.description()
            );
        }

        self.registry().update_status(id, status).await
    }

    async fn sync_all(&self) -> Vec<SyncFailure> {
        let connections = match self.registry().list().await {
            Ok(connections) => connections,
            Err(err) => {
                return vec![SyncFailure::new(
                    EntityRef::Registry,
                    err.failure_kind(),
                    err.to_string(),
                )]
            }
        };

        let mut tasks = JoinSet::new();
        for connection in connections {
            let usecase = self.clone();
            tasks.spawn(async move {
                let id = connection.get_id();
                usecase.sync_one(id.clone()).await.map_err(|err| {
                    warn!("[connection] sync failed for {}: {}", id, err);
                    SyncFailure::new(
                        EntityRef::Connection(id.to_string()),
                        err.failure_kind(),
                        err.to_string(),
                    )
                })
            });
        }

        let (_, failures) = drain(tasks).await;
        failures
    }

    async fn get_connection(
        &self,
        id: ConnectionID,
    ) -> Result<Self::EntityAccessor, ConnectionError> {
        self.registry().get(id).await
    }

    async fn list_connections(&self) -> Result<Vec<Self::EntityAccessor>, ConnectionError> {
        self.registry().list().await
    }

    async fn toggle_selected(
        &self,
        id: ConnectionID,
    ) -> Result<Self::EntityAccessor, ConnectionError> {
        self.registry().toggle_selected(id).await
    }

    async fn send_message(
        &self,
        id: ConnectionID,
        message: String,
    ) -> Result<String, ConnectionError> {
        if message.trim().is_empty() {
            return Err(ConnectionError::ValidationError(
                "message must not be empty".to_string(),
            ));
        }

        let connection = self.registry().get(id).await?;
        let message_id = self
            .agent()
            .connection_send_message(connection.get_handle(), message, MessageOptions::default())
            .await?;

        Ok(message_id)
    }

    async fn release(&self, id: ConnectionID) -> Result<Self::EntityAccessor, ConnectionError> {
        let connection = self.registry().get(id.clone()).await?;
        self.agent()
            .connection_release(connection.get_handle())
            .await?;

        let removed = self.registry().remove(id).await?;
        info!("[connection] released connection: {}", removed.get_id());
        Ok(removed)
    }

    async fn pairwise_info(&self, id: ConnectionID) -> Result<PairwiseInfo, ConnectionError> {
        let connection = self.registry().get(id.clone()).await?;
        let pw_did = self
            .agent()
            .connection_get_pw_did(connection.get_handle())
            .await?;

        let their_pw_did = self
            .agent()
            .connection_get_their_pw_did(connection.get_handle())
            .await?;

        Ok(PairwiseInfo {
            id,
            pw_did,
            their_pw_did,
        })
    }

    async fn export_connection(
        &self,
        id: ConnectionID,
    ) -> Result<ConnectionSnapshot, ConnectionError> {
        let connection = self.registry().get(id).await?;
        let serialized = self
            .agent()
            .connection_serialize(connection.get_handle())
            .await?;

        Ok(connection.snapshot(serialized))
    }

    async fn restore_connection(
        &self,
        snapshot: ConnectionSnapshot,
    ) -> Result<Self::EntityAccessor, ConnectionError> {
        if self.registry().contains(snapshot.id.clone()).await {
            return Err(ConnectionError::DuplicateInvitation(snapshot.id.to_string()));
        }

        let handle = self
            .agent()
            .connection_deserialize(snapshot.serialized.clone())
            .await?;

        let connection = self.track(Connection::restore(snapshot, handle)).await?;

        debug!(
            "[connection] restored connection: {} with handle: {}",
            connection.get_id(),
            handle
        );
        Ok(connection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use mockall::mock;
    use mockall::predicate::eq;

    use rst_common::standard::serde_json::{json, Value};
    use rst_common::with_tokio::tokio;

    use crate::agent::fake::SlowAgent;
    use crate::agent::types::AgentError;
    use crate::connection::registry::Registry;
    use crate::types::{FailureKind, Handle, StatusCode};

    mock!(
        FakeAgent{}

        impl Clone for FakeAgent {
            fn clone(&self) -> Self;
        }

        #[async_trait]
        impl AgentClient for FakeAgent {
            async fn connection_create(&self, invite_id: String, invite_details: Value) -> Result<Handle, AgentError>;
            async fn connection_connect(&self, handle: Handle, connection_type: ConnectionType) -> Result<(), AgentError>;
            async fn connection_get_state(&self, handle: Handle) -> Result<StatusCode, AgentError>;
            async fn connection_update_state(&self, handle: Handle) -> Result<StatusCode, AgentError>;
            async fn connection_send_message(&self, handle: Handle, message: String, options: MessageOptions) -> Result<String, AgentError>;
            async fn connection_release(&self, handle: Handle) -> Result<(), AgentError>;
            async fn connection_serialize(&self, handle: Handle) -> Result<String, AgentError>;
            async fn connection_deserialize(&self, serialized: String) -> Result<Handle, AgentError>;
            async fn connection_get_pw_did(&self, handle: Handle) -> Result<String, AgentError>;
            async fn connection_get_their_pw_did(&self, handle: Handle) -> Result<String, AgentError>;
            async fn credential_get_offers(&self, handle: Handle) -> Result<String, AgentError>;
            async fn credential_create_with_offer(&self, source_id: String, offer: String) -> Result<Handle, AgentError>;
            async fn credential_send_request(&self, credential_handle: Handle, connection_handle: Handle) -> Result<(), AgentError>;
            async fn credential_update_state_v2(&self, credential_handle: Handle, connection_handle: Handle) -> Result<StatusCode, AgentError>;
            async fn get_credential(&self, credential_handle: Handle) -> Result<String, AgentError>;
        }
    );

    fn generate_usecase(agent: MockFakeAgent, registry: Registry) -> Usecase<MockFakeAgent, Registry> {
        Usecase::new(agent, registry)
    }

    async fn seed_connection(registry: &Registry, id: &str, handle: Handle) {
        let conn = Connection::new(ConnectionID::from(id), handle, json!({"@id": id}));
        let _ = registry.upsert(conn).await;
    }

    #[tokio::test]
    async fn test_create_from_invitation_success() {
        let mut agent = MockFakeAgent::new();
        agent
            .expect_connection_create()
            .with(eq("abc123".to_string()), eq(json!({"@id": "abc123"})))
            .times(1)
            .returning(|_, _| Ok(7));

        let registry = Registry::new();
        let uc = generate_usecase(agent, registry.clone());

        let output = uc
            .create_from_invitation(r#"{"@id":"abc123"}"#.to_string())
            .await;
        assert!(!output.is_err());

        let conn = output.unwrap();
        assert_eq!(conn.get_id(), ConnectionID::from("abc123"));
        assert_eq!(conn.get_handle(), 7);
        assert_eq!(conn.get_status(), Status::Initialized);
        assert!(!conn.is_selected());

        let listed = registry.list().await.unwrap();
        assert_eq!(listed.len(), 1)
    }

    #[tokio::test]
    async fn test_create_from_invitation_missing_id() {
        let mut agent = MockFakeAgent::new();
        agent.expect_connection_create().never();

        let registry = Registry::new();
        let uc = generate_usecase(agent, registry.clone());

        let output = uc
            .create_from_invitation(r#"{"label":"Issuer"}"#.to_string())
            .await;
        assert!(output.is_err());
        assert!(matches!(
            output.unwrap_err(),
            ConnectionError::InvalidInvitation(_)
        ));

        let listed = registry.list().await.unwrap();
        assert!(listed.is_empty())
    }

    #[tokio::test]
    async fn test_create_from_invitation_duplicate() {
        let mut agent = MockFakeAgent::new();
        agent.expect_connection_create().never();

        let registry = Registry::new();
        seed_connection(&registry, "abc123", 7).await;

        let uc = generate_usecase(agent, registry.clone());
        let output = uc
            .create_from_invitation(r#"{"@id":"abc123"}"#.to_string())
            .await;

        assert!(matches!(
            output.unwrap_err(),
            ConnectionError::DuplicateInvitation(_)
        ))
    }

    #[tokio::test]
    async fn test_create_from_invitation_concurrent_same_id() {
        let agent = SlowAgent::new(Duration::from_millis(50));
        let registry = Registry::new();
        let uc = Usecase::new(agent.clone(), registry.clone());

        let invitation = r#"{"@id":"abc123"}"#.to_string();
        let (first, second) = tokio::join!(
            uc.create_from_invitation(invitation.clone()),
            uc.create_from_invitation(invitation.clone())
        );

        let outputs = vec![first, second];
        let tracked: Vec<&Connection> = outputs.iter().filter_map(|out| out.as_ref().ok()).collect();
        assert_eq!(tracked.len(), 1);
        assert!(outputs.iter().any(|out| matches!(
            out,
            Err(ConnectionError::DuplicateInvitation(_))
        )));

        let created = agent.created();
        let released = agent.released();
        assert_eq!(created.len(), 2);
        assert_eq!(released.len(), 1);
        assert_ne!(released[0], tracked[0].get_handle());

        let listed = registry.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].get_handle(), tracked[0].get_handle())
    }

    #[tokio::test]
    async fn test_create_from_invitation_agent_failed() {
        let mut agent = MockFakeAgent::new();
        agent
            .expect_connection_create()
            .times(1)
            .returning(|_, _| Err(AgentError::CallFailed("agency down".to_string())));

        let registry = Registry::new();
        let uc = generate_usecase(agent, registry.clone());

        let output = uc
            .create_from_invitation(r#"{"@id":"abc123"}"#.to_string())
            .await;

        assert!(matches!(
            output.unwrap_err(),
            ConnectionError::AgentCallFailed(_)
        ));
        assert!(registry.list().await.unwrap().is_empty())
    }

    #[tokio::test]
    async fn test_advance_only_initialized() {
        let mut agent = MockFakeAgent::new();
        agent
            .expect_connection_connect()
            .with(eq(7), eq(ConnectionType::default()))
            .times(1)
            .returning(|_, _| Ok(()));

        let registry = Registry::new();
        seed_connection(&registry, "initialized", 7).await;
        seed_connection(&registry, "accepted", 8).await;
        let _ = registry
            .update_status(ConnectionID::from("accepted"), Status::Accepted)
            .await;

        let uc = generate_usecase(agent, registry);
        assert!(!uc.advance_one(ConnectionID::from("initialized")).await.is_err());
        assert!(!uc.advance_one(ConnectionID::from("accepted")).await.is_err())
    }

    #[tokio::test]
    async fn test_refresh_status_idempotent() {
        let mut agent = MockFakeAgent::new();
        agent
            .expect_connection_update_state()
            .with(eq(7))
            .times(2)
            .returning(|_| Ok(2));

        let registry = Registry::new();
        seed_connection(&registry, "abc123", 7).await;
        let _ = registry.toggle_selected(ConnectionID::from("abc123")).await;

        let uc = generate_usecase(agent, registry.clone());
        let first = uc
            .refresh_status(ConnectionID::from("abc123"), RefreshMode::Update)
            .await
            .unwrap();

        let second = uc
            .refresh_status(ConnectionID::from("abc123"), RefreshMode::Update)
            .await
            .unwrap();

        assert_eq!(first.get_status(), Status::RequestSent);
        assert_eq!(second.get_status(), Status::RequestSent);
        assert_eq!(first.get_updated_at(), second.get_updated_at());
        assert!(second.is_selected())
    }

    #[tokio::test]
    async fn test_refresh_status_mirror_latest() {
        let counter = Arc::new(AtomicU32::new(0));
        let reported: Vec<StatusCode> = vec![2, 4, 3];

        let mut agent = MockFakeAgent::new();
        let counter_cloned = counter.clone();
        agent
            .expect_connection_get_state()
            .times(3)
            .returning(move |_| {
                let idx = counter_cloned.fetch_add(1, Ordering::SeqCst) as usize;
                Ok(reported[idx])
            });

        let registry = Registry::new();
        seed_connection(&registry, "abc123", 7).await;

        let uc = generate_usecase(agent, registry.clone());
        for _ in 0..3 {
            let _ = uc
                .refresh_status(ConnectionID::from("abc123"), RefreshMode::Get)
                .await;
        }

        let conn = registry.get(ConnectionID::from("abc123")).await.unwrap();
        assert_eq!(conn.get_status(), Status::OfferReceived)
    }

    #[tokio::test]
    async fn test_refresh_status_unknown_code() {
        let mut agent = MockFakeAgent::new();
        agent
            .expect_connection_update_state()
            .times(1)
            .returning(|_| Ok(9));

        let registry = Registry::new();
        seed_connection(&registry, "abc123", 7).await;

        let uc = generate_usecase(agent, registry.clone());
        let output = uc
            .refresh_status(ConnectionID::from("abc123"), RefreshMode::Update)
            .await;

        assert_eq!(output.unwrap_err(), ConnectionError::UnknownStatusCode(9));

        let conn = registry.get(ConnectionID::from("abc123")).await.unwrap();
        assert_eq!(conn.get_status(), Status::Initialized)
    }

    #[tokio::test]
    async fn test_sync_all_isolate_failure() {
        let mut agent = MockFakeAgent::new();
        agent
            .expect_connection_update_state()
            .times(3)
            .returning(|handle| match handle {
                2 => Err(AgentError::Timeout("connection_update_state exceeded".to_string())),
                _ => Ok(4),
            });
        agent.expect_connection_connect().never();

        let registry = Registry::new();
        seed_connection(&registry, "conn-1", 1).await;
        seed_connection(&registry, "conn-2", 2).await;
        seed_connection(&registry, "conn-3", 3).await;

        let uc = generate_usecase(agent, registry.clone());
        let failures = uc.sync_all().await;

        assert_eq!(failures.len(), 1);
        assert_eq!(
            failures[0].entity,
            EntityRef::Connection("conn-2".to_string())
        );
        assert_eq!(failures[0].kind, FailureKind::AgentCallTimeout);

        let first = registry.get(ConnectionID::from("conn-1")).await.unwrap();
        let second = registry.get(ConnectionID::from("conn-2")).await.unwrap();
        let third = registry.get(ConnectionID::from("conn-3")).await.unwrap();

        assert_eq!(first.get_status(), Status::Accepted);
        assert_eq!(second.get_status(), Status::Initialized);
        assert_eq!(third.get_status(), Status::Accepted)
    }

    #[tokio::test]
    async fn test_sync_all_connect_initialized() {
        let mut agent = MockFakeAgent::new();
        agent
            .expect_connection_update_state()
            .times(1)
            .returning(|_| Ok(1));
        agent
            .expect_connection_connect()
            .with(eq(7), eq(ConnectionType { use_public_did: false }))
            .times(1)
            .returning(|_, _| Ok(()));

        let registry = Registry::new();
        seed_connection(&registry, "abc123", 7).await;

        let uc = generate_usecase(agent, registry);
        let failures = uc.sync_all().await;
        assert!(failures.is_empty())
    }

    #[tokio::test]
    async fn test_toggle_selected_not_found() {
        let agent = MockFakeAgent::new();
        let uc = generate_usecase(agent, Registry::new());

        let output = uc.toggle_selected(ConnectionID::from("missing")).await;
        assert!(matches!(output.unwrap_err(), ConnectionError::NotFound(_)))
    }

    #[tokio::test]
    async fn test_send_message() {
        let mut agent = MockFakeAgent::new();
        agent
            .expect_connection_send_message()
            .with(
                eq(7),
                eq("hello".to_string()),
                eq(MessageOptions::default()),
            )
            .times(1)
            .returning(|_, _, _| Ok("msg-1".to_string()));

        let registry = Registry::new();
        seed_connection(&registry, "abc123", 7).await;

        let uc = generate_usecase(agent, registry);
        let output = uc
            .send_message(ConnectionID::from("abc123"), "hello".to_string())
            .await;
        assert_eq!(output.unwrap(), "msg-1".to_string());

        let empty = uc
            .send_message(ConnectionID::from("abc123"), "  ".to_string())
            .await;
        assert!(matches!(
            empty.unwrap_err(),
            ConnectionError::ValidationError(_)
        ))
    }

    #[tokio::test]
    async fn test_release_connection() {
        let mut agent = MockFakeAgent::new();
        agent
            .expect_connection_release()
            .with(eq(7))
            .times(1)
            .returning(|_| Ok(()));

        let registry = Registry::new();
        seed_connection(&registry, "abc123", 7).await;

        let uc = generate_usecase(agent, registry.clone());
        let released = uc.release(ConnectionID::from("abc123")).await;
        assert!(!released.is_err());
        assert!(!registry.contains(ConnectionID::from("abc123")).await)
    }

    #[tokio::test]
    async fn test_pairwise_info() {
        let mut agent = MockFakeAgent::new();
        agent
            .expect_connection_get_pw_did()
            .returning(|_| Ok("did:sov:mine".to_string()));
        agent
            .expect_connection_get_their_pw_did()
            .returning(|_| Ok("did:sov:theirs".to_string()));

        let registry = Registry::new();
        seed_connection(&registry, "abc123", 7).await;

        let uc = generate_usecase(agent, registry);
        let info = uc.pairwise_info(ConnectionID::from("abc123")).await.unwrap();
        assert_eq!(info.pw_did, "did:sov:mine".to_string());
        assert_eq!(info.their_pw_did, "did:sov:theirs".to_string())
    }

    #[tokio::test]
    async fn test_export_restore_connection() {
        let mut agent = MockFakeAgent::new();
        agent
            .expect_connection_serialize()
            .with(eq(7))
            .returning(|_| Ok("serialized-7".to_string()));
        agent
            .expect_connection_deserialize()
            .with(eq("serialized-7".to_string()))
            .returning(|_| Ok(11));

        let registry = Registry::new();
        seed_connection(&registry, "abc123", 7).await;
        let _ = registry
            .update_status(ConnectionID::from("abc123"), Status::Accepted)
            .await;

        let uc = generate_usecase(agent, registry.clone());
        let snapshot = uc
            .export_connection(ConnectionID::from("abc123"))
            .await
            .unwrap();

        let duplicated = uc.restore_connection(snapshot.clone()).await;
        assert!(matches!(
            duplicated.unwrap_err(),
            ConnectionError::DuplicateInvitation(_)
        ));

        let _ = registry.remove(ConnectionID::from("abc123")).await;
        let restored = uc.restore_connection(snapshot).await.unwrap();
        assert_eq!(restored.get_handle(), 11);
        assert_eq!(restored.get_status(), Status::Accepted)
    }
}
