use std::fmt::Display;

use super::distance::DistanceToTarget;

/// Notification emitted by the poller when an observed status changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatusEvent {
    /// The distance to target differs from the previous observation.
    /// Carries an unknown distance when the source failed to read.
    DistanceToTargetChanged(DistanceToTarget),

    /// The drive connection state differs from the previous observation.
    ConnectionStatusChanged(bool),
}

impl Display for StatusEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DistanceToTargetChanged(distance) => {
                write!(f, "<Status Event | distance_to_target:{}>", distance)
            }
            Self::ConnectionStatusChanged(connected) => {
                write!(f, "<Status Event | connected:{}>", connected)
            }
        }
    }
}
