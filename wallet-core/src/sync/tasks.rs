use rst_common::with_logging::log::error;
use rst_common::with_tokio::tokio::task::JoinSet;

use crate::types::{EntityRef, FailureKind, SyncFailure};

/// `drain` waits for all spawned per-entity tasks, splitting their outputs from their failures
///
/// A panicked task is reported as an [`FailureKind::Internal`] failure
pub(crate) async fn drain<T>(mut tasks: JoinSet<Result<T, SyncFailure>>) -> (Vec<T>, Vec<SyncFailure>)
where
    T: Send + 'static,
{
    let mut outputs = Vec::new();
    let mut failures = Vec::new();

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(output)) => outputs.push(output),
            Ok(Err(failure)) => failures.push(failure),
            Err(err) => {
                error!("[sync] task aborted: {}", err);
                failures.push(SyncFailure::new(
                    EntityRef::Registry,
                    FailureKind::Internal,
                    err.to_string(),
                ))
            }
        }
    }

    (outputs, failures)
}
