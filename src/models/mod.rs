pub mod distance;
pub mod drive_depth;
pub mod status_event;
