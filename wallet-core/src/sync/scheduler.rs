use std::sync::Arc;

use rst_common::standard::async_trait::async_trait;
use rst_common::with_logging::log::{debug, info, warn};
use rst_common::with_tokio::tokio::sync::Mutex;

use crate::connection::types::{
    ConnectionAPI, ConnectionEntityAccessor, ConnectionID, RefreshMode,
};
use crate::credential::types::CredentialAPI;
use crate::types::{EntityRef, SyncFailure};

use super::types::{SyncAPI, SyncError, SyncReport};

/// `Scheduler` owns both state machines and serializes their synchronization passes
///
/// Clones share the same pass lock
#[derive(Clone)]
pub struct Scheduler<TConnection, TCredential>
where
    TConnection: ConnectionAPI,
    TCredential: CredentialAPI,
{
    connection: TConnection,
    credential: TCredential,
    evict_materialized: bool,
    lock: Arc<Mutex<()>>,
}

impl<TConnection, TCredential> Scheduler<TConnection, TCredential>
where
    TConnection: ConnectionAPI,
    TCredential: CredentialAPI,
{
    pub fn new(connection: TConnection, credential: TCredential) -> Self {
        Self {
            connection,
            credential,
            evict_materialized: false,
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// `with_eviction` removes materialized credentials from memory at the end of each pass
    pub fn with_eviction(mut self, enabled: bool) -> Self {
        self.evict_materialized = enabled;
        self
    }

    pub fn connection(&self) -> TConnection {
        self.connection.clone()
    }

    pub fn credential(&self) -> TCredential {
        self.credential.clone()
    }
}

#[async_trait]
impl<TConnection, TCredential> SyncAPI for Scheduler<TConnection, TCredential>
where
    TConnection: ConnectionAPI,
    TCredential: CredentialAPI,
{
    type EntityAccessor = TConnection::EntityAccessor;

    async fn tick(&self) -> Result<SyncReport, SyncError> {
        let _pass = self.lock.try_lock().map_err(|_| {
            warn!("[sync] tick rejected, another pass still running");
            SyncError::TickInProgress
        })?;

        let mut failures = self.connection.sync_all().await;
        let mut credentials = self.credential.process().await;
        failures.append(&mut credentials.failures);

        let mut evicted = 0;
        if self.evict_materialized {
            match self.credential.evict_materialized().await {
                Ok(removed) => evicted = removed.len(),
                Err(err) => failures.push(SyncFailure::new(
                    EntityRef::Registry,
                    err.failure_kind(),
                    err.to_string(),
                )),
            }
        }

        info!(
            "[sync] tick finished, failures: {}, materialized: {}, evicted: {}",
            failures.len(),
            credentials.materialized.len(),
            evicted
        );

        Ok(SyncReport {
            failures,
            materialized: credentials.materialized,
            evicted,
        })
    }

    async fn release_connection(
        &self,
        id: ConnectionID,
    ) -> Result<Self::EntityAccessor, SyncError> {
        let _pass = self.lock.lock().await;

        let released = self.connection.release(id).await?;
        let forgotten = self
            .credential
            .forget_connection(released.get_handle())
            .await?;

        debug!(
            "[sync] connection {} released with {} credentials",
            released.get_id(),
            forgotten.len()
        );
        Ok(released)
    }

    async fn refresh_connection(
        &self,
        id: ConnectionID,
        mode: RefreshMode,
    ) -> Result<Self::EntityAccessor, SyncError> {
        let _pass = self.lock.lock().await;
        let refreshed = self.connection.refresh_status(id, mode).await?;
        Ok(refreshed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use mockall::mock;
    use mockall::predicate::eq;

    use rst_common::standard::serde_json::Value;
    use rst_common::with_tokio::tokio;

    use crate::agent::fake::SlowAgent;
    use crate::agent::types::{AgentClient, AgentError, ConnectionType, MessageOptions};
    use crate::agent::TimedAgent;
    use crate::connection::types::{
        ConnectionError, ConnectionSnapshot, PairwiseInfo, RegistryBuilder,
    };
    use crate::connection::{Connection, Registry as ConnectionRegistry, Usecase as ConnectionUsecase};
    use crate::credential::types::{CredentialError, CredentialReport};
    use crate::credential::{Credential, Registry as CredentialRegistry, Usecase as CredentialUsecase};
    use crate::types::{FailureKind, Handle, MaterializedCredential, Status, StatusCode};

    mock!(
        FakeConnection{}

        impl Clone for FakeConnection {
            fn clone(&self) -> Self;
        }

        #[async_trait]
        impl ConnectionAPI for FakeConnection {
            type EntityAccessor = Connection;

            async fn create_from_invitation(&self, invitation: String) -> Result<Connection, ConnectionError>;
            async fn advance_one(&self, id: ConnectionID) -> Result<(), ConnectionError>;
            async fn refresh_status(&self, id: ConnectionID, mode: RefreshMode) -> Result<Connection, ConnectionError>;
            async fn sync_all(&self) -> Vec<SyncFailure>;
            async fn get_connection(&self, id: ConnectionID) -> Result<Connection, ConnectionError>;
            async fn list_connections(&self) -> Result<Vec<Connection>, ConnectionError>;
            async fn toggle_selected(&self, id: ConnectionID) -> Result<Connection, ConnectionError>;
            async fn send_message(&self, id: ConnectionID, message: String) -> Result<String, ConnectionError>;
            async fn release(&self, id: ConnectionID) -> Result<Connection, ConnectionError>;
            async fn pairwise_info(&self, id: ConnectionID) -> Result<PairwiseInfo, ConnectionError>;
            async fn export_connection(&self, id: ConnectionID) -> Result<ConnectionSnapshot, ConnectionError>;
            async fn restore_connection(&self, snapshot: ConnectionSnapshot) -> Result<Connection, ConnectionError>;
        }
    );

    mock!(
        FakeCredential{}

        impl Clone for FakeCredential {
            fn clone(&self) -> Self;
        }

        #[async_trait]
        impl CredentialAPI for FakeCredential {
            type EntityAccessor = Credential;

            async fn process(&self) -> CredentialReport;
            async fn collect_offers(&self) -> Vec<SyncFailure>;
            async fn refresh_credentials(&self) -> CredentialReport;
            async fn get_credential(&self, handle: Handle) -> Result<Credential, CredentialError>;
            async fn list_credentials(&self) -> Result<Vec<Credential>, CredentialError>;
            async fn list_offers(&self, connection_id: ConnectionID) -> Result<Vec<Value>, CredentialError>;
            async fn forget_connection(&self, connection_handle: Handle) -> Result<Vec<Credential>, CredentialError>;
            async fn evict_materialized(&self) -> Result<Vec<Credential>, CredentialError>;
        }
    );

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

    fn fake_failure(id: &str) -> SyncFailure {
        SyncFailure::new(
            EntityRef::Connection(id.to_string()),
            FailureKind::AgentCallFailed,
            "agency down".to_string(),
        )
    }

    #[tokio::test]
    async fn test_tick_merge_reports() {
        let mut connection = MockFakeConnection::new();
        connection
            .expect_sync_all()
            .times(1)
            .returning(|| vec![fake_failure("conn-2")]);

        let mut credential = MockFakeCredential::new();
        credential.expect_process().times(1).returning(|| CredentialReport {
            failures: vec![],
            materialized: vec![MaterializedCredential {
                credential_handle: 21,
                connection_handle: 7,
                connection_id: "abc123".to_string(),
                payload: "{}".to_string(),
            }],
        });
        credential.expect_evict_materialized().never();

        let scheduler = Scheduler::new(connection, credential);
        let report = scheduler.tick().await;
        assert!(!report.is_err());

        let report = report.unwrap();
        assert!(!report.is_clean());
        assert_eq!(report.failures[0], fake_failure("conn-2"));
        assert_eq!(report.materialized.len(), 1);
        assert_eq!(report.evicted, 0)
    }

    #[tokio::test]
    async fn test_tick_with_eviction() {
        let mut connection = MockFakeConnection::new();
        connection.expect_sync_all().returning(Vec::new);

        let mut credential = MockFakeCredential::new();
        credential
            .expect_process()
            .returning(CredentialReport::default);
        credential.expect_evict_materialized().times(1).returning(|| {
            Ok(vec![Credential::new(
                21,
                7,
                ConnectionID::from("abc123"),
                "o1".to_string(),
            )])
        });

        let scheduler = Scheduler::new(connection, credential).with_eviction(true);
        let report = scheduler.tick().await.unwrap();
        assert!(report.is_clean());
        assert_eq!(report.evicted, 1)
    }

    #[tokio::test]
    async fn test_tick_in_progress() {
        let mut connection = MockFakeConnection::new();
        connection.expect_sync_all().never();

        let mut credential = MockFakeCredential::new();
        credential.expect_process().never();

        let scheduler = Scheduler::new(connection, credential);
        let _running = scheduler.lock.lock().await;

        let report = scheduler.tick().await;
        assert!(report.is_err());
        assert_eq!(report.unwrap_err(), SyncError::TickInProgress)
    }

    #[tokio::test]
    async fn test_release_connection_forget_credentials() {
        let mut connection = MockFakeConnection::new();
        connection
            .expect_release()
            .with(eq(ConnectionID::from("abc123")))
            .times(1)
            .returning(|id| Ok(Connection::new(id, 7, Value::Null)));

        let mut credential = MockFakeCredential::new();
        credential
            .expect_forget_connection()
            .with(eq(7))
            .times(1)
            .returning(|_| Ok(vec![]));

        let scheduler = Scheduler::new(connection, credential);
        let released = scheduler
            .release_connection(ConnectionID::from("abc123"))
            .await;

        assert!(!released.is_err());
        assert_eq!(released.unwrap().get_handle(), 7)
    }

    #[tokio::test]
    async fn test_release_connection_not_found() {
        let mut connection = MockFakeConnection::new();
        connection
            .expect_release()
            .returning(|id| Err(ConnectionError::NotFound(id.to_string())));

        let mut credential = MockFakeCredential::new();
        credential.expect_forget_connection().never();

        let scheduler = Scheduler::new(connection, credential);
        let released = scheduler
            .release_connection(ConnectionID::from("missing"))
            .await;

        assert!(matches!(
            released.unwrap_err(),
            SyncError::ConnectionError(ConnectionError::NotFound(_))
        ))
    }

    #[tokio::test]
    async fn test_refresh_connection_wait_running_pass() {
        let mut connection = MockFakeConnection::new();
        connection
            .expect_refresh_status()
            .with(eq(ConnectionID::from("abc123")), eq(RefreshMode::Get))
            .times(1)
            .returning(|id, _| Ok(Connection::new(id, 7, Value::Null)));

        let scheduler = Scheduler::new(connection, MockFakeCredential::new());

        let running = scheduler.lock.lock().await;
        let blocked = tokio::time::timeout(
            Duration::from_millis(50),
            scheduler.refresh_connection(ConnectionID::from("abc123"), RefreshMode::Get),
        )
        .await;
        assert!(blocked.is_err());
        drop(running);

        let refreshed = scheduler
            .refresh_connection(ConnectionID::from("abc123"), RefreshMode::Get)
            .await;
        assert!(!refreshed.is_err());
        assert_eq!(refreshed.unwrap().get_handle(), 7)
    }

    #[tokio::test]
    async fn test_tick_report_agent_timeout() {
        let agent = TimedAgent::new(
            SlowAgent::new(Duration::from_millis(300)),
            Duration::from_millis(20),
        );

        let connection_registry = ConnectionRegistry::new();
        let _ = connection_registry
            .upsert(Connection::new(ConnectionID::from("abc123"), 7, Value::Null))
            .await;

        let connection_uc = ConnectionUsecase::new(agent.clone(), connection_registry.clone());
        let credential_uc =
            CredentialUsecase::new(agent, connection_registry.clone(), CredentialRegistry::new());

        let scheduler = Scheduler::new(connection_uc, credential_uc);
        let report = scheduler.tick().await;
        assert!(!report.is_err());

        let report = report.unwrap();
        assert_eq!(report.failures.len(), 1);
        assert_eq!(
            report.failures[0].entity,
            EntityRef::Connection("abc123".to_string())
        );
        assert_eq!(report.failures[0].kind, FailureKind::AgentCallTimeout);

        let connection = connection_registry
            .get(ConnectionID::from("abc123"))
            .await
            .unwrap();
        assert_eq!(connection.get_status(), Status::Initialized)
    }

    #[tokio::test]
    async fn test_full_issuance_flow() {
        let connection_calls = Arc::new(AtomicU32::new(0));
        let connection_calls_cloned = connection_calls.clone();

        let mut connection_agent = MockFakeAgent::new();
        connection_agent
            .expect_connection_create()
            .times(1)
            .returning(|_, _| Ok(7));
        connection_agent
            .expect_connection_update_state()
            .with(eq(7))
            .returning(move |_| match connection_calls_cloned.fetch_add(1, Ordering::SeqCst) {
                0 => Ok(1),
                _ => Ok(4),
            });
        connection_agent
            .expect_connection_connect()
            .with(eq(7), eq(ConnectionType::default()))
            .times(1)
            .returning(|_, _| Ok(()));

        let offer_calls = Arc::new(AtomicU32::new(0));
        let offer_calls_cloned = offer_calls.clone();

        let mut credential_agent = MockFakeAgent::new();
        credential_agent
            .expect_credential_get_offers()
            .with(eq(7))
            .returning(move |_| match offer_calls_cloned.fetch_add(1, Ordering::SeqCst) {
                0 => Ok("[]".to_string()),
                _ => Ok(r#"[{"@id":"o1"}]"#.to_string()),
            });
        credential_agent
            .expect_credential_create_with_offer()
            .with(eq("abc123".to_string()), eq(r#"{"@id":"o1"}"#.to_string()))
            .times(1)
            .returning(|_, _| Ok(21));
        credential_agent
            .expect_credential_send_request()
            .with(eq(21), eq(7))
            .times(1)
            .returning(|_, _| Ok(()));
        credential_agent
            .expect_credential_update_state_v2()
            .times(1)
            .returning(|_, _| Ok(4));
        credential_agent
            .expect_get_credential()
            .with(eq(21))
            .times(1)
            .returning(|_| Ok(r#"{"name":"alice"}"#.to_string()));

        let connection_registry = ConnectionRegistry::new();
        let connection_uc = ConnectionUsecase::new(connection_agent, connection_registry.clone());
        let credential_uc = CredentialUsecase::new(
            credential_agent,
            connection_registry.clone(),
            CredentialRegistry::new(),
        );

        let created = connection_uc
            .create_from_invitation(r#"{"@id":"abc123"}"#.to_string())
            .await
            .unwrap();
        assert_eq!(created.get_status(), Status::Initialized);

        let scheduler = Scheduler::new(connection_uc.clone(), credential_uc);

        let first = scheduler.tick().await.unwrap();
        assert!(first.is_clean());
        assert!(first.materialized.is_empty());

        let second = scheduler.tick().await.unwrap();
        assert!(second.is_clean());
        assert_eq!(second.materialized.len(), 1);
        assert_eq!(second.materialized[0].connection_id, "abc123".to_string());

        let third = scheduler.tick().await.unwrap();
        assert!(third.is_clean());
        assert!(third.materialized.is_empty());

        let connection = connection_uc
            .get_connection(ConnectionID::from("abc123"))
            .await
            .unwrap();
        assert_eq!(connection.get_status(), Status::Accepted)
    }
}
