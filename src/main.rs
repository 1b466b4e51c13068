// Main entry point - Dependency injection, background polling and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::application::monitor_service::MonitorService;
use crate::application::poller::spawn_poller;
use crate::application::streaming_service::StreamingDashboardService;
use crate::infrastructure::config::load_monitor_config;
use crate::infrastructure::http_source::HttpTelemetrySource;
use crate::presentation::app_state::AppState;
use crate::presentation::routes::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,grill_monitor=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = load_monitor_config()?;
    let settings = config.monitor_settings()?;
    let addr = config.listen_addr()?;

    // Create telemetry source (infrastructure layer)
    let source = Arc::new(HttpTelemetrySource::new(
        &config.backend.base_url,
        config.request_timeout(),
    )?);

    // Create services (application layer)
    let monitor_service = MonitorService::new(source, settings);
    let streaming_service =
        StreamingDashboardService::new(monitor_service.clone(), config.stream_interval());
    let poller = spawn_poller(monitor_service.clone(), config.poll_interval());

    let state = Arc::new(AppState {
        monitor_service,
        streaming_service,
    });

    tracing::info!(
        "Starting grill-monitor on {}, polling {} every {:?}",
        addr,
        config.backend.base_url,
        config.poll_interval()
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    poller.shutdown().await;
    tracing::info!("grill-monitor stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
