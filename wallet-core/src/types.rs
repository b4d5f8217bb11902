use rst_common::standard::serde::{self, Deserialize, Serialize};
use rst_common::with_errors::thiserror::{self, Error};

/// `Handle` is an opaque reference to a session object owned by the agent runtime
pub type Handle = u32;

/// `StatusCode` is the raw status value reported by the agent runtime
pub type StatusCode = u32;

#[derive(Debug, PartialEq, Error, Clone)]
#[error("unknown status code: {0}")]
pub struct UnknownStatusCode(pub StatusCode);

/// `Status` mirrors the remote protocol progression for both connections and credentials
///
/// The wallet never advances this value by itself, it is always taken from the value
/// reported by the agent runtime
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(crate = "self::serde")]
pub enum Status {
    Initialized,
    RequestSent,
    OfferReceived,
    Accepted,
}

impl Status {
    pub fn code(&self) -> StatusCode {
        match self {
            Status::Initialized => 1,
            Status::RequestSent => 2,
            Status::OfferReceived => 3,
            Status::Accepted => 4,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Status::Initialized => "Initialized",
            Status::RequestSent => "Request Sent",
            Status::OfferReceived => "Offer Received",
            Status::Accepted => "Accepted",
        }
    }
}

impl TryFrom<StatusCode> for Status {
    type Error = UnknownStatusCode;

    fn try_from(value: StatusCode) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Status::Initialized),
            2 => Ok(Status::RequestSent),
            3 => Ok(Status::OfferReceived),
            4 => Ok(Status::Accepted),
            code => Err(UnknownStatusCode(code)),
        }
    }
}

/// `EntityRef` points to the entity that failed during a synchronization pass
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(crate = "self::serde")]
#[serde(tag = "entity", content = "id")]
pub enum EntityRef {
    Connection(String),
    Credential(Handle),
    Registry,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(crate = "self::serde")]
pub enum FailureKind {
    AgentCallFailed,
    AgentCallTimeout,
    UnknownStatusCode,
    InvalidOffer,
    NotFound,
    Internal,
}

/// `SyncFailure` is a single isolated failure collected during a synchronization pass
///
/// A failure never stops the pass, it will be reported to the caller once the pass is done
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(crate = "self::serde")]
pub struct SyncFailure {
    pub entity: EntityRef,
    pub kind: FailureKind,
    pub message: String,
}

impl SyncFailure {
    pub fn new(entity: EntityRef, kind: FailureKind, message: String) -> Self {
        Self {
            entity,
            kind,
            message,
        }
    }
}

/// `MaterializedCredential` is the final credential payload fetched once the issuance accepted
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(crate = "self::serde")]
pub struct MaterializedCredential {
    pub credential_handle: Handle,
    pub connection_handle: Handle,
    pub connection_id: String,
    pub payload: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use table_test::table_test;

    #[test]
    fn test_status_from_code() {
        let table: Vec<(StatusCode, Status)> = vec![
            (1, Status::Initialized),
            (2, Status::RequestSent),
            (3, Status::OfferReceived),
            (4, Status::Accepted),
        ];

        for (validator, input, expected) in table_test!(table) {
            let status = Status::try_from(input);
            assert!(!status.is_err());

            validator
                .given(&format!("{:?}", input))
                .when("mapped to status")
                .then("follow the wire code")
                .assert_eq(expected, status.unwrap());
        }
    }

    #[test]
    fn test_status_code_roundtrip() {
        for status in [
            Status::Initialized,
            Status::RequestSent,
            Status::OfferReceived,
            Status::Accepted,
        ] {
            assert_eq!(Status::try_from(status.code()).unwrap(), status)
        }
    }

    #[test]
    fn test_status_unknown_code() {
        for code in [0u32, 5, 42] {
            let status = Status::try_from(code);
            assert!(status.is_err());
            assert_eq!(status.unwrap_err(), UnknownStatusCode(code))
        }
    }
}
