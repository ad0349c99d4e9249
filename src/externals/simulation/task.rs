use std::{sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::externals::parameter_store::services::InMemoryParameterStore;

use super::adapters::ReplayStatusSource;

/// Task: Stands in for the host UI. Periodically writes the next recorded
/// distance into the parameter store under `key`.
/// Can be cancelled.
#[tracing::instrument(skip_all)]
pub async fn task_feed_parameter_store(
    token: CancellationToken,
    store: Arc<InMemoryParameterStore>,
    key: String,
    interval: Duration,
) {
    info!("Started.");
    let mut replay = ReplayStatusSource::recorded_descent();
    loop {
        business_logic(&mut replay, &store, &key);

        tokio::select! {
            _ = token.cancelled() => {
                warn!("Cancelled.");
                break;
            },
            _ = tokio::time::sleep(interval) => {}
        };
    }
}

/// Perform task business logic.
/// Write the next reading of the trace as text, the way the host stores it.
fn business_logic(replay: &mut ReplayStatusSource, store: &InMemoryParameterStore, key: &str) {
    trace!("Executing business logic.");
    match replay.next_value() {
        Some(value) => {
            store.set_parameter(key, value.to_string());
            debug!("Wrote parameter '{}' = {}", key, value);
        }
        None => {
            warn!("No recorded value to write.");
        }
    }
}
