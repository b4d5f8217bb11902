use std::time::Duration;

use rst_common::with_logging::log::{debug, error, info, warn};
use rst_common::with_tokio::tokio;
use rst_common::with_tokio::tokio::time::MissedTickBehavior;

use prople_wallet_core::sync::types::{SyncAPI, SyncReport};
use prople_wallet_rpc::rpc::wallet::{persist_all, restore_all, Runtime};

use crate::errors::WalletError;

/// `Ticker` drives the synchronization pass at a fixed interval
///
/// Each successful pass is followed by a snapshot of all tracked connections
pub struct Ticker {
    runtime: Runtime,
    interval: Duration,
}

impl Ticker {
    pub fn new(runtime: Runtime, interval: Duration) -> Self {
        Self { runtime, interval }
    }

    pub fn is_enabled(&self) -> bool {
        !self.interval.is_zero()
    }

    /// `restore` rebuilds the connections saved by the previous run
    pub async fn restore(&self) -> Result<usize, WalletError> {
        let scheduler = self.runtime.scheduler();
        let restored = restore_all(&scheduler.connection(), &self.runtime.snapshots())
            .await
            .map_err(|err| WalletError::SyncError(err.to_string()))?;

        info!("[ticker] restored {} connections", restored);
        Ok(restored)
    }

    pub async fn run(self) {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            let _ = self.tick_once().await;
        }
    }

    pub async fn tick_once(&self) -> Option<SyncReport> {
        let scheduler = self.runtime.scheduler();
        let report = match scheduler.tick().await {
            Ok(report) => report,
            Err(err) => {
                warn!("[ticker] pass skipped: {}", err);
                return None;
            }
        };

        for failure in report.failures.iter() {
            warn!(
                "[ticker] {:?} failed with {:?}: {}",
                failure.entity, failure.kind, failure.message
            );
        }

        for credential in report.materialized.iter() {
            info!(
                "[ticker] credential {} received from connection {}",
                credential.credential_handle, credential.connection_id
            );
            debug!("[ticker] credential payload: {}", credential.payload);
        }

        match persist_all(&scheduler.connection(), &self.runtime.snapshots()).await {
            Ok(total) => debug!("[ticker] persisted {} snapshots", total),
            Err(err) => error!("[ticker] unable to persist snapshots: {}", err),
        }

        Some(report)
    }
}
