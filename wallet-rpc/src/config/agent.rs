use std::time::Duration;

use multiaddr::Multiaddr;

use rst_common::standard::serde::{self, Deserialize};

use prople_wallet_core::agent::DEFAULT_CALL_TIMEOUT_SECS;

use crate::common::types::{CommonError, ToValidate};

/// `Agent` locates the agent runtime JSON-RPC server
///
/// The address is a [`Multiaddr`] text, e.g: `/ip4/127.0.0.1/tcp/9090`
#[derive(Deserialize, Debug, Clone)]
#[serde(crate = "self::serde")]
pub struct Agent {
    pub(super) address: String,
    pub(super) timeout_secs: u64,
}

impl Agent {
    pub fn get_address(&self) -> Result<Multiaddr, CommonError> {
        self.address
            .parse::<Multiaddr>()
            .map_err(|err| CommonError::ConfigError(err.to_string()))
    }

    pub fn get_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for Agent {
    fn default() -> Self {
        Self {
            address: "".to_string(),
            timeout_secs: DEFAULT_CALL_TIMEOUT_SECS,
        }
    }
}

impl ToValidate for Agent {
    fn validate(&self) -> Result<(), CommonError> {
        if self.address.is_empty() {
            return Err(CommonError::ValidationError(
                "config: agent:address is missing".to_string(),
            ));
        }

        if self.get_address().is_err() {
            return Err(CommonError::ValidationError(
                "config: agent:address is not a valid multiaddr".to_string(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(CommonError::ValidationError(
                "config: agent:timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
