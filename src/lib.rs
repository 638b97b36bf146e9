pub mod config;
pub mod domain;
pub mod server;
pub mod setup;
pub mod telemetry;
pub mod vendor;
