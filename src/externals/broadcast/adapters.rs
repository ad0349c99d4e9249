use tokio::sync::broadcast::Sender;
use tracing::{trace, warn};

use crate::{internals::core::ports::StatusEventPort, models::status_event::StatusEvent};

/// Forwards status events onto a broadcast channel so async consumers, such
/// as a UI bridge or the event logger, can subscribe.
pub struct EmitToBroadcastAdapter {
    tx_status_event: Sender<StatusEvent>,
}

impl EmitToBroadcastAdapter {
    pub fn new(tx_status_event: Sender<StatusEvent>) -> Self {
        Self { tx_status_event }
    }
}

impl StatusEventPort for EmitToBroadcastAdapter {
    fn emit(&self, event: StatusEvent) {
        match self.tx_status_event.send(event) {
            Err(e) => warn!("Failed to broadcast status event. Error: {}", e),
            Ok(receivers) => trace!("Broadcast status event to {} receivers.", receivers),
        }
    }
}
