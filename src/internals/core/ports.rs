use crate::models::{distance::DistanceToTarget, status_event::StatusEvent};

/// Inbound port: where the poller reads the current status from.
/// Exactly one implementation is active for a poller.
pub trait StatusSource: Send {
    /// Read the latest distance to target. Failures must be reported as
    /// `DistanceToTarget::UNKNOWN` rather than propagated.
    fn read_distance_to_target(&mut self) -> DistanceToTarget;

    /// Read the connection state of the underlying device, if the source
    /// has one.
    fn read_connection_status(&mut self) -> Option<bool> {
        None
    }
}

impl<S: StatusSource + ?Sized> StatusSource for Box<S> {
    fn read_distance_to_target(&mut self) -> DistanceToTarget {
        (**self).read_distance_to_target()
    }

    fn read_connection_status(&mut self) -> Option<bool> {
        (**self).read_connection_status()
    }
}

/// Outbound port: receives every status change in sampling order.
/// Called from inside the poller's locked section, so a slow port delays
/// the next tick.
pub trait StatusEventPort: Send {
    fn emit(&self, event: StatusEvent);
}

impl<F> StatusEventPort for F
where
    F: Fn(StatusEvent) + Send,
{
    fn emit(&self, event: StatusEvent) {
        self(event)
    }
}

pub type MultiPort = Vec<Box<dyn StatusEventPort>>;
