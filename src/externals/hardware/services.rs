use thiserror::Error;

use crate::models::drive_depth::DriveDepth;

/// This service separates the vendor drive SDK from the polling logic, which
/// keeps the poller testable without hardware attached.
pub trait DriveService: Send {
    /// Attempt to read the current drive depth. Returns an appropriate error
    /// if the driver reports a non-OK status.
    fn get_drive_depth(&self) -> Result<DriveDepth, DriveServiceError>;

    /// Whether the driver currently has a connection to the device.
    fn is_connected(&self) -> Result<bool, DriveServiceError>;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DriveServiceError {
    /// The driver call returned something other than OK.
    #[error("Drive returned non-OK status code {0}.")]
    Status(i32),

    /// The driver has no connection to the device.
    #[error("Drive is not connected.")]
    NotConnected,
}
