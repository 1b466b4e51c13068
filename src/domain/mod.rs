// Domain layer - Samples, windowing, statistics and chart state
pub mod chart;
pub mod dashboard;
pub mod error;
pub mod monitor;
pub mod sample;
pub mod scope;
pub mod statistics;
pub mod telemetry;
