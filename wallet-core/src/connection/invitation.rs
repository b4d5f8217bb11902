use rst_common::standard::serde_json::{self, Value};

use super::types::{ConnectionError, ConnectionID};

const INVITATION_ID_KEY: &str = "@id";

/// `Invitation` is a parsed out-of-band invitation, a JSON object which must have a non-empty
/// `@id` property
#[derive(Debug, Clone)]
pub struct Invitation {
    id: ConnectionID,
    details: Value,
}

impl Invitation {
    pub fn parse(raw: &str) -> Result<Self, ConnectionError> {
        let details: Value = serde_json::from_str(raw.trim())
            .map_err(|err| ConnectionError::InvalidInvitation(err.to_string()))?;

        let object = details.as_object().ok_or_else(|| {
            ConnectionError::InvalidInvitation("invitation must be a JSON object".to_string())
        })?;

        let id = object
            .get(INVITATION_ID_KEY)
            .and_then(|value| value.as_str())
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                ConnectionError::InvalidInvitation("missing invitation @id".to_string())
            })?;

        Ok(Self {
            id: ConnectionID::from(id),
            details,
        })
    }

    pub fn id(&self) -> ConnectionID {
        self.id.to_owned()
    }

    pub fn details(&self) -> Value {
        self.details.to_owned()
    }
}
