use tokio::sync::broadcast::{error::RecvError, Receiver};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::models::status_event::StatusEvent;

/// Task: Log every status event received from the poller.
/// Ends when cancelled or when every sender is gone.
#[tracing::instrument(skip_all)]
pub async fn task_status_event_logging(
    token: CancellationToken,
    mut rx_status_event: Receiver<StatusEvent>,
) {
    info!("Started.");
    loop {
        tokio::select! {
            _ = token.cancelled() => {
                warn!("Cancelled.");
                break;
            },
            result = rx_status_event.recv() => match result {
                Ok(event) => info!("Got status event: {}", event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Status event logger lagged behind. Skipped: {}", skipped);
                }
                Err(RecvError::Closed) => {
                    warn!("Status event channel closed.");
                    break;
                }
            }
        };
    }
}
