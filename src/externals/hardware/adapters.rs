use tracing::{error, trace, warn};

use crate::{
    config::DRIVE_ZERO_POSITION_MM,
    internals::core::ports::StatusSource,
    models::distance::DistanceToTarget,
};

use super::services::DriveService;

/// Reads the distance to target from the microdrive by applying the zero
/// position calibration to the raw drive depth.
pub struct DriveStatusSource<D: DriveService> {
    service: D,
    zero_offset_mm: f32,
}

impl<D: DriveService> DriveStatusSource<D> {
    pub fn new(service: D, zero_offset_mm: f32) -> Self {
        Self {
            service,
            zero_offset_mm,
        }
    }

    /// Source calibrated with the zero position of the current drive.
    pub fn with_default_calibration(service: D) -> Self {
        Self::new(service, DRIVE_ZERO_POSITION_MM)
    }

    pub fn zero_offset_mm(&self) -> f32 {
        self.zero_offset_mm
    }
}

impl<D: DriveService> StatusSource for DriveStatusSource<D> {
    fn read_distance_to_target(&mut self) -> DistanceToTarget {
        match self.service.get_drive_depth() {
            Ok(depth) => {
                trace!("Got drive depth: {}", depth);
                DistanceToTarget::from_drive_depth(depth, self.zero_offset_mm)
            }
            Err(e) => {
                error!("Failed to get drive depth. Error: {}", e);
                DistanceToTarget::UNKNOWN
            }
        }
    }

    fn read_connection_status(&mut self) -> Option<bool> {
        match self.service.is_connected() {
            Ok(connected) => Some(connected),
            Err(e) => {
                warn!("Failed to get drive connection status. Error: {}", e);
                Some(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::VecDeque, sync::Mutex};

    use super::*;
    use crate::{
        externals::hardware::services::DriveServiceError, models::drive_depth::DriveDepth,
    };

    struct ScriptedDrive {
        depths: Mutex<VecDeque<Result<DriveDepth, DriveServiceError>>>,
        connected: Result<bool, DriveServiceError>,
    }

    impl ScriptedDrive {
        fn new(depths: Vec<Result<DriveDepth, DriveServiceError>>) -> Self {
            Self {
                depths: Mutex::new(depths.into()),
                connected: Ok(true),
            }
        }
    }

    impl DriveService for ScriptedDrive {
        fn get_drive_depth(&self) -> Result<DriveDepth, DriveServiceError> {
            self.depths
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(DriveServiceError::NotConnected))
        }

        fn is_connected(&self) -> Result<bool, DriveServiceError> {
            self.connected.clone()
        }
    }

    #[test]
    fn test_depth_is_calibrated() {
        let drive = ScriptedDrive::new(vec![Ok(DriveDepth::from(10500))]);
        let mut source = DriveStatusSource::with_default_calibration(drive);
        assert_eq!(source.zero_offset_mm(), 25f32);
        assert_eq!(source.read_distance_to_target().millimeters(), Some(14.5f32));
    }

    #[test]
    fn test_custom_zero_offset() {
        let drive = ScriptedDrive::new(vec![Ok(DriveDepth::from(10500))]);
        let mut source = DriveStatusSource::new(drive, 20f32);
        assert_eq!(source.read_distance_to_target().millimeters(), Some(9.5f32));
    }

    #[test]
    fn test_failed_read_is_unknown() {
        let drive = ScriptedDrive::new(vec![
            Err(DriveServiceError::Status(-3)),
            Ok(DriveDepth::from(25000)),
        ]);
        let mut source = DriveStatusSource::with_default_calibration(drive);
        assert!(source.read_distance_to_target().is_unknown());
        assert_eq!(source.read_distance_to_target().millimeters(), Some(0f32));
    }

    #[test]
    fn test_connection_status() {
        let mut drive = ScriptedDrive::new(vec![]);
        drive.connected = Ok(true);
        let mut source = DriveStatusSource::with_default_calibration(drive);
        assert_eq!(source.read_connection_status(), Some(true));

        let mut drive = ScriptedDrive::new(vec![]);
        drive.connected = Err(DriveServiceError::Status(-1));
        let mut source = DriveStatusSource::with_default_calibration(drive);
        assert_eq!(source.read_connection_status(), Some(false));
    }
}
