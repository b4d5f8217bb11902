use std::time::Duration;

use rst_common::standard::serde::{self, Deserialize};

use crate::common::types::{CommonError, ToValidate};

#[derive(Deserialize, Debug, Clone)]
#[serde(crate = "self::serde")]
pub struct App {
    pub(super) host: String,
    pub(super) port: String,

    #[serde(default = "default_request_timeout_secs")]
    pub(super) request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    120
}

impl App {
    pub fn get_app_config(&self) -> (String, String) {
        (self.host.to_owned(), self.port.to_owned())
    }

    /// `get_request_timeout` bounds a single HTTP request served by the daemon
    pub fn get_request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for App {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: "8181".to_string(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ToValidate for App {
    fn validate(&self) -> Result<(), CommonError> {
        if self.host.is_empty() {
            return Err(CommonError::ValidationError(
                "config: app:host is missing".to_string(),
            ));
        }

        if self.port.parse::<u16>().is_err() {
            return Err(CommonError::ValidationError(
                "config: app:port is not a valid port".to_string(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(CommonError::ValidationError(
                "config: app:request_timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
