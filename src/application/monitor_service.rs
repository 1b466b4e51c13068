// Monitor service - Use cases for ingesting telemetry and building dashboards
use crate::application::telemetry_source::{StatsReading, TelemetrySource};
use crate::domain::dashboard::Dashboard;
use crate::domain::error::ControlError;
use crate::domain::monitor::{MonitorEvent, MonitorSettings, MonitorState};
use crate::domain::sample::Sample;
use anyhow::Context;
use chrono::{DateTime, Local, TimeZone, Utc};
use std::fmt::Display;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct MonitorService {
    source: Arc<dyn TelemetrySource>,
    state: Arc<RwLock<MonitorState>>,
}

impl MonitorService {
    pub fn new(source: Arc<dyn TelemetrySource>, settings: MonitorSettings) -> Self {
        Self {
            source,
            state: Arc::new(RwLock::new(MonitorState::new(settings))),
        }
    }

    /// Pre-populate the log from the backend backlog. Returns the log size.
    pub async fn load_history(&self) -> anyhow::Result<usize> {
        let samples = self
            .source
            .fetch_history()
            .await
            .context("Failed to fetch history")?;

        let mut state = self.state.write().await;
        state
            .apply(MonitorEvent::HistoryLoaded(samples))
            .context("Failed to apply history")?;
        Ok(state.samples().len())
    }

    /// Fetch one stats response and apply it, stamped with the receipt time
    pub async fn poll_once(&self) -> anyhow::Result<()> {
        let reading = self
            .source
            .fetch_stats()
            .await
            .context("Failed to fetch stats")?;
        let event = polled_event(reading, Utc::now());

        self.state
            .write()
            .await
            .apply(event)
            .context("Failed to apply poll")?;
        Ok(())
    }

    /// Apply a user control and return the refreshed dashboard
    pub async fn control(&self, event: MonitorEvent) -> Result<Dashboard, ControlError> {
        let mut state = self.state.write().await;
        state.apply(event)?;
        Ok(state.dashboard(Utc::now(), &Local))
    }

    pub async fn dashboard(&self) -> Dashboard {
        self.dashboard_at(Utc::now(), &Local).await
    }

    pub async fn dashboard_at<Tz>(&self, now: DateTime<Utc>, tz: &Tz) -> Dashboard
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        self.state.read().await.dashboard(now, tz)
    }

    pub async fn sample_count(&self) -> usize {
        self.state.read().await.samples().len()
    }
}

/// A poll yields a sample only when the backend reported both temperatures
fn polled_event(reading: StatsReading, received_at: DateTime<Utc>) -> MonitorEvent {
    let sample = match (reading.grill_temp, reading.probe_temp) {
        (Some(grill), Some(probe)) => Some(Sample::new(received_at, grill, probe)),
        _ => {
            tracing::debug!("Stats response without a full temperature pair");
            None
        }
    };
    MonitorEvent::Polled {
        reading: sample,
        snapshot: reading.snapshot,
    }
}
