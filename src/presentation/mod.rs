// Presentation layer - HTTP surface over the monitor
pub mod app_state;
pub mod handlers;
pub mod routes;
