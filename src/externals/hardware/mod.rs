pub mod adapters;
pub mod services;
