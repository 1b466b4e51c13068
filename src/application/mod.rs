// Application layer - Use cases over the monitor state
pub mod monitor_service;
pub mod poller;
pub mod streaming_service;
pub mod telemetry_source;
