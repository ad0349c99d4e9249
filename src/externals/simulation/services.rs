use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{
    externals::hardware::services::{DriveService, DriveServiceError},
    models::drive_depth::DriveDepth,
};

use super::RECORDED_DESCENT_MM;

/// Stand-in for the vendor drive SDK. Reports the recorded descent as raw
/// depths for a drive calibrated at `zero_offset_mm`.
pub struct SimulatedDriveService {
    zero_offset_mm: f32,
    position: AtomicUsize,
}

impl SimulatedDriveService {
    pub fn new(zero_offset_mm: f32) -> Self {
        Self {
            zero_offset_mm,
            position: AtomicUsize::new(0),
        }
    }
}

impl DriveService for SimulatedDriveService {
    fn get_drive_depth(&self) -> Result<DriveDepth, DriveServiceError> {
        let index = self.position.fetch_add(1, Ordering::SeqCst) % RECORDED_DESCENT_MM.len();
        let distance_mm = RECORDED_DESCENT_MM[index];
        let micrometers = ((self.zero_offset_mm - distance_mm) * 1000f32).round() as i32;
        Ok(DriveDepth::from(micrometers))
    }

    fn is_connected(&self) -> Result<bool, DriveServiceError> {
        Ok(true)
    }
}
