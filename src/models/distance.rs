use std::fmt::Display;

use super::drive_depth::DriveDepth;

/// Calibrated distance between the electrode tip and the planned target, in
/// millimeters. Positive values are above the target.
///
/// A reading that could not be produced is stored as `NaN` and reported as
/// unknown. Equality follows IEEE-754, so two unknown readings are never equal
/// and every unknown observation counts as a change.
///
/// ```
/// use drive_status::models::{distance::DistanceToTarget, drive_depth::DriveDepth};
/// let distance = DistanceToTarget::from_drive_depth(DriveDepth::from(10500), 25f32);
/// assert_eq!(distance.millimeters(), Some(14.5f32));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceToTarget {
    value: f32,
}

impl DistanceToTarget {
    /// A reading that could not be produced this tick.
    pub const UNKNOWN: Self = Self { value: f32::NAN };

    pub fn from_millimeters(value: f32) -> Self {
        Self { value }
    }

    /// Apply the drive zero position to a raw depth.
    /// `distance = zero_offset_mm - depth_um / 1000`
    pub fn from_drive_depth(depth: DriveDepth, zero_offset_mm: f32) -> Self {
        Self {
            value: zero_offset_mm - depth.millimeters(),
        }
    }

    /// Distance in millimeters, or `None` if the reading is unknown.
    pub fn millimeters(&self) -> Option<f32> {
        if self.is_unknown() {
            None
        } else {
            Some(self.value)
        }
    }

    /// The underlying value including the `NaN` sentinel.
    pub fn raw(&self) -> f32 {
        self.value
    }

    pub fn is_unknown(&self) -> bool {
        self.value.is_nan()
    }
}

impl Default for DistanceToTarget {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

impl From<f32> for DistanceToTarget {
    fn from(value: f32) -> Self {
        Self::from_millimeters(value)
    }
}

impl Display for DistanceToTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.millimeters() {
            Some(mm) => write!(f, "({} mm)", mm),
            None => write!(f, "(no reading)"),
        }
    }
}
