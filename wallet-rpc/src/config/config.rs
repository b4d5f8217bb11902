use rst_common::standard::serde::{self, Deserialize};

use crate::common::types::{CommonError, ToValidate};

use super::{Agent, App, Database, SyncOptions};

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(crate = "self::serde")]
pub struct Config {
    pub(super) app: App,
    pub(super) agent: Agent,

    #[serde(default)]
    pub(super) sync: SyncOptions,
    pub(super) database: Database,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn sync(&self) -> &SyncOptions {
        &self.sync
    }

    pub fn db(&self) -> &Database {
        &self.database
    }
}

impl ToValidate for Config {
    fn validate(&self) -> Result<(), CommonError> {
        self.app.validate()?;
        self.agent.validate()?;
        self.sync.validate()?;
        self.database.validate()?;

        if self.app.get_request_timeout() <= self.agent.get_timeout() {
            return Err(CommonError::ValidationError(
                "config: app:request_timeout_secs must be greater than agent:timeout_secs"
                    .to_string(),
            ));
        }

        Ok(())
    }
}
