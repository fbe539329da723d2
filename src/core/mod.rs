pub mod config;
pub mod metrics;
pub mod signals;
pub mod telemetry;
pub mod time;
