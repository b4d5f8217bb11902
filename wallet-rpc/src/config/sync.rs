use std::time::Duration;

use rst_common::standard::serde::{self, Deserialize};

use prople_wallet_core::connection::types::RefreshMode;
use prople_wallet_core::credential::types::OfferFraming;

use crate::common::types::{CommonError, ToValidate};

const MAX_INTERVAL_SECS: u64 = 86_400;

/// `SyncOptions` controls the periodic synchronization pass run by the daemon
///
/// An `interval_secs` of zero disables the daemon ticker, passes are then only
/// triggered through the `sync.tick` RPC method
#[derive(Deserialize, Debug, Clone)]
#[serde(crate = "self::serde")]
pub struct SyncOptions {
    pub(super) interval_secs: u64,

    #[serde(default)]
    pub(super) offer_framing: OfferFraming,

    #[serde(default)]
    pub(super) refresh_mode: RefreshMode,

    #[serde(default)]
    pub(super) evict_materialized: bool,
}

impl SyncOptions {
    pub fn get_interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn is_ticker_enabled(&self) -> bool {
        self.interval_secs > 0
    }

    pub fn get_offer_framing(&self) -> OfferFraming {
        self.offer_framing
    }

    pub fn get_refresh_mode(&self) -> RefreshMode {
        self.refresh_mode
    }

    pub fn is_evict_materialized(&self) -> bool {
        self.evict_materialized
    }
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            interval_secs: 5,
            offer_framing: OfferFraming::default(),
            refresh_mode: RefreshMode::default(),
            evict_materialized: false,
        }
    }
}

impl ToValidate for SyncOptions {
    fn validate(&self) -> Result<(), CommonError> {
        if self.interval_secs > MAX_INTERVAL_SECS {
            return Err(CommonError::ValidationError(format!(
                "config: sync:interval_secs must not exceed {}",
                MAX_INTERVAL_SECS
            )));
        }

        Ok(())
    }
}
