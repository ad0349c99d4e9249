use derive_more::{Display, From};

/// Raw position of the microdrive as reported by the hardware, in micrometers.
/// This is the depth before the zero position calibration is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, From)]
#[display(fmt = "({} um)", micrometers)]
pub struct DriveDepth {
    pub micrometers: i32,
}

impl DriveDepth {
    /// Depth converted to millimeters.
    pub fn millimeters(&self) -> f32 {
        self.micrometers as f32 / 1000f32
    }
}
