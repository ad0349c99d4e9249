use tracing::{debug, instrument, trace};

use crate::models::{distance::DistanceToTarget, status_event::StatusEvent};

use super::ports::{MultiPort, StatusSource};

/// Samples a `StatusSource` and emits a `StatusEvent` to every port whenever
/// an observation differs from the previous one.
pub struct StatusMonitor<S: StatusSource> {
    source: S,
    ports: MultiPort,
    previous_distance: DistanceToTarget,
    previous_connection: bool,
}

impl<S: StatusSource> StatusMonitor<S> {
    pub fn new(source: S, ports: MultiPort) -> Self {
        Self {
            source,
            ports,
            previous_distance: DistanceToTarget::UNKNOWN,
            previous_connection: false,
        }
    }

    /// Last distance that was emitted. Unknown until the first tick.
    pub fn previous_distance(&self) -> DistanceToTarget {
        self.previous_distance
    }

    /// Perform one sample of the source.
    /// Connection state is checked first, then the distance.
    #[instrument(skip_all)]
    pub fn tick(&mut self) {
        if let Some(connected) = self.source.read_connection_status() {
            if connected != self.previous_connection {
                debug!("Connection status changed. Connected: {}", connected);
                self.emit(StatusEvent::ConnectionStatusChanged(connected));
                self.previous_connection = connected;
            }
        }

        let distance = self.source.read_distance_to_target();
        if distance != self.previous_distance {
            debug!("Distance to target changed: {}", distance);
            self.emit(StatusEvent::DistanceToTargetChanged(distance));
            self.previous_distance = distance;
        } else {
            trace!("Distance to target unchanged.");
        }
    }

    fn emit(&self, event: StatusEvent) {
        for port in self.ports.iter() {
            port.emit(event);
        }
    }
}
