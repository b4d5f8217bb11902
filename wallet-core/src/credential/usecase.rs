use std::sync::Arc;

use rst_common::standard::async_trait::async_trait;
use rst_common::standard::serde_json::Value;
use rst_common::with_logging::log::{debug, info, warn};
use rst_common::with_tokio::tokio::task::JoinSet;

use crate::agent::types::AgentClient;
use crate::connection::types::{
    ConnectionEntityAccessor, ConnectionID, RegistryBuilder as ConnectionRegistryBuilder,
};
use crate::connection::Connection;
use crate::sync::tasks::drain;
use crate::types::{EntityRef, Handle, MaterializedCredential, Status, SyncFailure};

use super::credential::Credential;
use super::offer::Offer;
use super::types::{
    CredentialAPI, CredentialEntityAccessor, CredentialError, CredentialReport, OfferFraming,
    RegistryBuilder, UsecaseBuilder,
};

/// `Usecase` is base logic implementation for the [`CredentialAPI`]
///
/// Besides its own registry, it reads the connection registry to know which connections
/// may receive credential offers
#[derive(Clone)]
pub struct Usecase<TAgent, TConnectionRegistry, TRegistry>
where
    TAgent: AgentClient,
    TConnectionRegistry: ConnectionRegistryBuilder<EntityAccessor = Connection>,
    TRegistry: RegistryBuilder<EntityAccessor = Credential>,
{
    agent: Arc<TAgent>,
    connections: TConnectionRegistry,
    registry: TRegistry,
    framing: OfferFraming,
}

impl<TAgent, TConnectionRegistry, TRegistry> Usecase<TAgent, TConnectionRegistry, TRegistry>
where
    TAgent: AgentClient + 'static,
    TConnectionRegistry: ConnectionRegistryBuilder<EntityAccessor = Connection> + 'static,
    TRegistry: RegistryBuilder<EntityAccessor = Credential> + 'static,
{
    pub fn new(agent: TAgent, connections: TConnectionRegistry, registry: TRegistry) -> Self {
        Self {
            agent: Arc::new(agent),
            connections,
            registry,
            framing: OfferFraming::default(),
        }
    }

    pub fn with_framing(mut self, framing: OfferFraming) -> Self {
        self.framing = framing;
        self
    }

    async fn collect_offer(&self, connection: Connection) -> Result<Option<Credential>, SyncFailure> {
        let connection_ref = EntityRef::Connection(connection.get_id().to_string());
        let to_failure = |err: CredentialError| {
            warn!(
                "[credential] unable to consume offer for {}: {}",
                connection.get_id(),
                err
            );
            SyncFailure::new(connection_ref.clone(), err.failure_kind(), err.to_string())
        };

        let handle = connection.get_handle();
        let raw = self
            .agent()
            .credential_get_offers(handle)
            .await
            .map_err(|err| to_failure(err.into()))?;

        let mut offer = None;
        for candidate in Offer::candidates(&raw, self.framing).map_err(to_failure)? {
            if !self.registry().is_offer_consumed(handle, candidate.id()).await {
                offer = Some(candidate);
                break;
            }

            debug!(
                "[credential] offer {} already consumed by {}",
                candidate.id(),
                connection.get_id()
            );
        }

        let offer = match offer {
            Some(offer) => offer,
            None => return Ok(None),
        };

        let credential_handle = self
            .agent()
            .credential_create_with_offer(connection.get_id().to_string(), offer.body())
            .await
            .map_err(|err| to_failure(err.into()))?;

        let credential = Credential::new(credential_handle, handle, connection.get_id(), offer.id());
        self.registry()
            .track(credential.clone())
            .await
            .map_err(to_failure)?;

        info!(
            "[credential] credential {} created from offer {}",
            credential_handle,
            offer.id()
        );

        self.send_request(credential)
            .await
            .map(Some)
            .map_err(|err| Self::credential_failure(credential_handle, err))
    }

    async fn send_request(&self, mut credential: Credential) -> Result<Credential, CredentialError> {
        self.agent()
            .credential_send_request(credential.get_handle(), credential.get_connection_handle())
            .await?;

        credential.mark_request_sent();
        self.registry().update(credential.clone()).await?;

        debug!("[credential] request sent for {}", credential.get_handle());
        Ok(credential)
    }

    async fn refresh_one(
        &self,
        credential: Credential,
    ) -> Result<Option<MaterializedCredential>, CredentialError> {
        let mut credential = match credential.is_request_sent() {
            true => credential,
            false => self.send_request(credential).await?,
        };

        let code = self
            .agent()
            .credential_update_state_v2(credential.get_handle(), credential.get_connection_handle())
            .await?;

        let status = Status::try_from(code)?;
        credential.update_status(status);
        self.registry().update(credential.clone()).await?;

        if status != Status::Accepted || credential.is_materialized() {
            return Ok(None);
        }

        let payload = self.agent().get_credential(credential.get_handle()).await?;
        let materialized = credential.materialize(payload);
        self.registry().update(credential.clone()).await?;

        if materialized.is_some() {
            info!(
                "[credential] credential {} materialized",
                credential.get_handle()
            );
        }

        Ok(materialized)
    }

    fn credential_failure(handle: Handle, err: CredentialError) -> SyncFailure {
        warn!("[credential] credential {} failed: {}", handle, err);
        SyncFailure::new(
            EntityRef::Credential(handle),
            err.failure_kind(),
            err.to_string(),
        )
    }
}

impl<TAgent, TConnectionRegistry, TRegistry> UsecaseBuilder<Credential>
    for Usecase<TAgent, TConnectionRegistry, TRegistry>
where
    TAgent: AgentClient + 'static,
    TConnectionRegistry: ConnectionRegistryBuilder<EntityAccessor = Connection> + 'static,
    TRegistry: RegistryBuilder<EntityAccessor = Credential> + 'static,
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
impl<TAgent, TConnectionRegistry, TRegistry> CredentialAPI
    for Usecase<TAgent, TConnectionRegistry, TRegistry>
where
    TAgent: AgentClient + 'static,
    TConnectionRegistry: ConnectionRegistryBuilder<EntityAccessor = Connection> + 'static,
    TRegistry: RegistryBuilder<EntityAccessor = Credential> + 'static,
{
    type EntityAccessor = Credential;

    async fn process(&self) -> CredentialReport {
        let mut failures = self.collect_offers().await;
        let mut report = self.refresh_credentials().await;

        failures.append(&mut report.failures);
        report.failures = failures;
        report
    }

    async fn collect_offers(&self) -> Vec<SyncFailure> {
        let connections = match self.connections.list().await {
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
            tasks.spawn(async move { usecase.collect_offer(connection).await });
        }

        let (_, failures) = drain(tasks).await;
        failures
    }

    async fn refresh_credentials(&self) -> CredentialReport {
        let credentials = match self.registry().list().await {
            Ok(credentials) => credentials,
            Err(err) => {
                return CredentialReport {
                    failures: vec![SyncFailure::new(
                        EntityRef::Registry,
                        err.failure_kind(),
                        err.to_string(),
                    )],
                    materialized: Vec::new(),
                }
            }
        };

        let mut tasks = JoinSet::new();
        for credential in credentials
            .into_iter()
            .filter(|credential| !credential.is_materialized())
        {
            let usecase = self.clone();
            tasks.spawn(async move {
                let handle = credential.get_handle();
                usecase
                    .refresh_one(credential)
                    .await
                    .map_err(|err| Self::credential_failure(handle, err))
            });
        }

        let (outputs, failures) = drain(tasks).await;
        CredentialReport {
            failures,
            materialized: outputs.into_iter().flatten().collect(),
        }
    }

    async fn get_credential(
        &self,
        handle: Handle,
    ) -> Result<Self::EntityAccessor, CredentialError> {
        self.registry().get(handle).await
    }

    async fn list_credentials(&self) -> Result<Vec<Self::EntityAccessor>, CredentialError> {
        self.registry().list().await
    }

    async fn list_offers(&self, connection_id: ConnectionID) -> Result<Vec<Value>, CredentialError> {
        let connection = self.connections.get(connection_id).await?;
        let raw = self
            .agent()
            .credential_get_offers(connection.get_handle())
            .await?;

        Offer::parse_list(&raw)
    }

    async fn forget_connection(
        &self,
        connection_handle: Handle,
    ) -> Result<Vec<Self::EntityAccessor>, CredentialError> {
        let removed = self.registry().remove_by_connection(connection_handle).await?;
        debug!(
            "[credential] forget {} credentials of connection handle {}",
            removed.len(),
            connection_handle
        );
        Ok(removed)
    }

    async fn evict_materialized(&self) -> Result<Vec<Self::EntityAccessor>, CredentialError> {
        self.registry().evict_materialized().await
    }
}
