pub mod broadcast;
pub mod event_logging;
pub mod hardware;
pub mod parameter_store;
pub mod simulation;
