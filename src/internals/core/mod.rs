pub mod monitor;
pub mod poller;
pub mod ports;
