//! Background poller which watches the microdrive's distance to target and
//! notifies listeners whenever it changes.

pub mod config;
pub mod externals;
pub mod internals;
pub mod models;
