use rst_common::standard::chrono::serde::ts_seconds;
use rst_common::standard::chrono::{DateTime, Utc};
use rst_common::standard::serde::{self, Deserialize, Serialize};
use rst_common::standard::serde_json;

use rstdev_domain::entity::ToJSON;
use rstdev_domain::BaseError;

use crate::connection::types::ConnectionID;
use crate::types::{Handle, MaterializedCredential, Status};

use super::types::{CredentialEntityAccessor, CredentialError};

/// `Credential` tracks a single issuance handshake started from a credential offer
///
/// The `payload` only exists once the credential has been accepted and fetched from
/// the agent runtime, it will never be fetched twice
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(crate = "self::serde")]
pub struct Credential {
    pub(crate) handle: Handle,
    pub(crate) connection_handle: Handle,
    pub(crate) connection_id: ConnectionID,
    pub(crate) offer_id: String,
    pub(crate) status: Status,
    pub(crate) request_sent: bool,
    pub(crate) payload: Option<String>,

    #[serde(with = "ts_seconds")]
    pub(crate) created_at: DateTime<Utc>,

    #[serde(with = "ts_seconds")]
    pub(crate) updated_at: DateTime<Utc>,
}

impl Credential {
    pub fn new(
        handle: Handle,
        connection_handle: Handle,
        connection_id: ConnectionID,
        offer_id: String,
    ) -> Self {
        Self {
            handle,
            connection_handle,
            connection_id,
            offer_id,
            status: Status::Initialized,
            request_sent: false,
            payload: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub(crate) fn mark_request_sent(&mut self) -> &mut Self {
        self.request_sent = true;
        self.updated_at = Utc::now();
        self
    }

    pub(crate) fn update_status(&mut self, status: Status) -> &mut Self {
        if self.status != status {
            self.status = status;
            self.updated_at = Utc::now();
        }

        self
    }

    /// `materialize` stores the final credential payload
    ///
    /// Returns `None` when the credential has already been materialized before
    pub(crate) fn materialize(&mut self, payload: String) -> Option<MaterializedCredential> {
        if self.payload.is_some() {
            return None;
        }

        self.payload = Some(payload.clone());
        self.updated_at = Utc::now();

        Some(MaterializedCredential {
            credential_handle: self.handle,
            connection_handle: self.connection_handle,
            connection_id: self.connection_id.to_string(),
            payload,
        })
    }
}

impl ToJSON for Credential {
    fn to_json(&self) -> Result<String, BaseError> {
        let json_str =
            serde_json::to_string(&self).map_err(|err| BaseError::ToJSONError(err.to_string()))?;

        Ok(json_str)
    }
}

impl TryFrom<Credential> for Vec<u8> {
    type Error = CredentialError;

    fn try_from(value: Credential) -> Result<Self, Self::Error> {
        serde_json::to_vec(&value).map_err(|err| CredentialError::EntityError(err.to_string()))
    }
}

impl TryFrom<Vec<u8>> for Credential {
    type Error = CredentialError;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        serde_json::from_slice(&value).map_err(|err| CredentialError::EntityError(err.to_string()))
    }
}

impl CredentialEntityAccessor for Credential {
    fn get_handle(&self) -> Handle {
        self.handle
    }

    fn get_connection_handle(&self) -> Handle {
        self.connection_handle
    }

    fn get_connection_id(&self) -> ConnectionID {
        self.connection_id.to_owned()
    }

    fn get_offer_id(&self) -> String {
        self.offer_id.to_owned()
    }

    fn get_status(&self) -> Status {
        self.status
    }

    fn is_request_sent(&self) -> bool {
        self.request_sent
    }

    fn is_materialized(&self) -> bool {
        self.payload.is_some()
    }

    fn get_payload(&self) -> Option<String> {
        self.payload.to_owned()
    }

    fn get_created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn get_updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
