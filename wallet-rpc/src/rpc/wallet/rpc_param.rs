use rst_common::standard::serde::{self, Deserialize, Serialize};
use rst_common::standard::serde_json::{self, Value};

use prople_jsonrpc_client::types::{ExecutorError, RpcValue};

use prople_wallet_core::connection::types::RefreshMode;
use prople_wallet_core::types::Handle;

use crate::common::types::CommonError;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(crate = "self::serde")]
#[serde(tag = "param", content = "payload")]
pub enum Param {
    CreateFromInvitation {
        invitation: String,
    },
    Connection {
        id: String,
    },
    SendMessage {
        id: String,
        message: String,
    },
    RefreshStatus {
        id: String,
        mode: Option<RefreshMode>,
    },
    Credential {
        handle: Handle,
    },
}

impl RpcValue for Param {
    fn build_serde_value(&self) -> Result<Value, ExecutorError> {
        serde_json::to_value(self).map_err(|err| ExecutorError::BuildValueError(err.to_string()))
    }
}

impl TryFrom<Value> for Param {
    type Error = CommonError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        serde_json::from_value(value).map_err(|err| CommonError::JSONError(err.to_string()))
    }
}
