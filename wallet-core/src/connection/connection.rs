use rst_common::standard::chrono::serde::ts_seconds;
use rst_common::standard::chrono::{DateTime, Utc};
use rst_common::standard::serde::{self, Deserialize, Serialize};
use rst_common::standard::serde_json::{self, Value};

use rstdev_domain::entity::ToJSON;
use rstdev_domain::BaseError;

use crate::types::{Handle, Status};

use super::types::{ConnectionEntityAccessor, ConnectionError, ConnectionID, ConnectionSnapshot};

/// `Connection` is main entity data structure of a pairwise relationship with an inviter
///
/// The `handle` is an opaque reference of the session object kept by the agent runtime,
/// and the `status` is only a mirror of the remote protocol progression
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(crate = "self::serde")]
pub struct Connection {
    pub(crate) id: ConnectionID,
    pub(crate) handle: Handle,
    pub(crate) status: Status,
    pub(crate) invite_details: Value,
    pub(crate) selected: bool,

    #[serde(with = "ts_seconds")]
    pub(crate) created_at: DateTime<Utc>,

    #[serde(with = "ts_seconds")]
    pub(crate) updated_at: DateTime<Utc>,
}

impl Connection {
    pub fn new(id: ConnectionID, handle: Handle, invite_details: Value) -> Self {
        Self {
            id,
            handle,
            status: Status::Initialized,
            invite_details,
            selected: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// `restore` rebuilds the entity from its snapshot using a fresh handle
    pub fn restore(snapshot: ConnectionSnapshot, handle: Handle) -> Self {
        Self {
            id: snapshot.id,
            handle,
            status: snapshot.status,
            invite_details: snapshot.invite_details,
            selected: snapshot.selected,
            created_at: snapshot.created_at,
            updated_at: Utc::now(),
        }
    }

    pub fn snapshot(&self, serialized: String) -> ConnectionSnapshot {
        ConnectionSnapshot {
            id: self.id.clone(),
            status: self.status,
            invite_details: self.invite_details.clone(),
            selected: self.selected,
            serialized,
            created_at: self.created_at,
        }
    }

    pub(crate) fn update_status(&mut self, status: Status) -> &mut Self {
        if self.status != status {
            self.status = status;
            self.updated_at = Utc::now();
        }

        self
    }

    pub(crate) fn toggle_selected(&mut self) -> &mut Self {
        self.selected = !self.selected;
        self.updated_at = Utc::now();
        self
    }
}

impl ToJSON for Connection {
    fn to_json(&self) -> Result<String, BaseError> {
        let json_str =
            serde_json::to_string(&self).map_err(|err| BaseError::ToJSONError(err.to_string()))?;

        Ok(json_str)
    }
}

impl TryFrom<Connection> for Vec<u8> {
    type Error = ConnectionError;

    fn try_from(value: Connection) -> Result<Self, Self::Error> {
        serde_json::to_vec(&value).map_err(|err| ConnectionError::EntityError(err.to_string()))
    }
}

impl TryFrom<Vec<u8>> for Connection {
    type Error = ConnectionError;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        serde_json::from_slice(&value).map_err(|err| ConnectionError::EntityError(err.to_string()))
    }
}

impl ConnectionEntityAccessor for Connection {
    fn get_id(&self) -> ConnectionID {
        self.id.to_owned()
    }

    fn get_handle(&self) -> Handle {
        self.handle
    }

    fn get_status(&self) -> Status {
        self.status
    }

    fn get_invite_details(&self) -> Value {
        self.invite_details.to_owned()
    }

    fn is_selected(&self) -> bool {
        self.selected
    }

    fn get_created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn get_updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
