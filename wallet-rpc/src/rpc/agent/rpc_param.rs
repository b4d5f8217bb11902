use rst_common::standard::serde::{self, Deserialize, Serialize};
use rst_common::standard::serde_json::{self, Value};

use prople_jsonrpc_client::types::{ExecutorError, RpcValue};

use prople_wallet_core::agent::types::{ConnectionType, MessageOptions};
use prople_wallet_core::types::Handle;

/// `Param` is the request payload sent to the agent runtime
///
/// Several methods share the same payload shape, e.g: every connection read only needs
/// the connection handle
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(crate = "self::serde")]
#[serde(tag = "param", content = "payload")]
pub enum Param {
    ConnectionCreate {
        invite_id: String,
        invite_details: Value,
    },
    ConnectionConnect {
        handle: Handle,
        connection_type: ConnectionType,
    },
    ConnectionHandle {
        handle: Handle,
    },
    ConnectionSendMessage {
        handle: Handle,
        message: String,
        options: MessageOptions,
    },
    ConnectionDeserialize {
        serialized: String,
    },
    CredentialCreateWithOffer {
        source_id: String,
        offer: String,
    },
    CredentialExchange {
        credential_handle: Handle,
        connection_handle: Handle,
    },
    CredentialHandle {
        credential_handle: Handle,
    },
}

impl RpcValue for Param {
    fn build_serde_value(&self) -> Result<Value, ExecutorError> {
        serde_json::to_value(self).map_err(|err| ExecutorError::BuildValueError(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_connection_handle_json_str() {
        let param = Param::ConnectionHandle { handle: 7 };
        let try_json = serde_json::to_string(&param);
        assert!(!try_json.is_err());

        let expected = r#"{"param":"ConnectionHandle","payload":{"handle":7}}"#;
        assert_eq!(expected, try_json.unwrap())
    }

    #[test]
    fn test_build_connection_connect_value() {
        let param = Param::ConnectionConnect {
            handle: 7,
            connection_type: ConnectionType::default(),
        };

        let value = param.build_serde_value();
        assert!(!value.is_err());
        assert_eq!(
            value.unwrap(),
            serde_json::json!({
                "param": "ConnectionConnect",
                "payload": {
                    "handle": 7,
                    "connection_type": {"use_public_did": false}
                }
            })
        )
    }
}
