// HTTP telemetry source backed by the grill backend's JSON API
use crate::application::telemetry_source::{StatsReading, TelemetrySource};
use crate::domain::sample::Sample;
use crate::domain::telemetry::TelemetrySnapshot;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpTelemetrySource {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct HistoryRecord {
    time: Option<f64>,
    grill_temp: Option<f64>,
    probe_temp: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StatsResponse {
    grill_temp: Option<f64>,
    probe_temp: Option<f64>,
    grill_set: Option<f64>,
    probe_set: Option<f64>,
    connected: Option<bool>,
    ambient_temp: Option<f64>,
    last_connected: Option<Instant>,
    session_start_time: Option<Instant>,
    cook_timer_remaining: Option<f64>,
    is_simulated: Option<bool>,
    is_idle: Option<bool>,
    is_stale: Option<bool>,
}

/// The backend reports instants either as UNIX seconds or as RFC 3339 text
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Instant {
    UnixSeconds(f64),
    Text(String),
}

impl Instant {
    fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            Instant::UnixSeconds(secs) => unix_seconds(*secs),
            Instant::Text(text) => DateTime::parse_from_rfc3339(text)
                .map(|t| t.with_timezone(&Utc))
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(unix_seconds)),
        }
    }
}

fn unix_seconds(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis((secs * 1000.0).round() as i64)
}

impl StatsResponse {
    fn into_reading(self) -> StatsReading {
        StatsReading {
            grill_temp: self.grill_temp,
            probe_temp: self.probe_temp,
            snapshot: TelemetrySnapshot {
                grill_set: self.grill_set,
                probe_set: self.probe_set,
                connected: self.connected,
                ambient_temp: self.ambient_temp,
                last_connected: self.last_connected.as_ref().and_then(Instant::to_utc),
                session_start_time: self.session_start_time.as_ref().and_then(Instant::to_utc),
                cook_timer_remaining: self.cook_timer_remaining,
                simulated: self.is_simulated.unwrap_or(false),
                idle: self.is_idle.unwrap_or(false),
                stale: self.is_stale.unwrap_or(false),
            },
        }
    }
}

impl HistoryRecord {
    fn into_sample(self) -> Option<Sample> {
        Some(Sample::new(
            unix_seconds(self.time?)?,
            self.grill_temp?,
            self.probe_temp?,
        ))
    }
}

impl HttpTelemetrySource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Backend request {} failed with status {}: {}", path, status, body);
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse response from {}", path))
    }
}

#[async_trait]
impl TelemetrySource for HttpTelemetrySource {
    async fn fetch_history(&self) -> Result<Vec<Sample>> {
        let records: Vec<HistoryRecord> = self.get_json("/api/history").await?;
        let total = records.len();

        let samples: Vec<Sample> = records
            .into_iter()
            .filter_map(HistoryRecord::into_sample)
            .collect();
        if samples.len() < total {
            tracing::debug!("Skipped {} incomplete history records", total - samples.len());
        }
        Ok(samples)
    }

    async fn fetch_stats(&self) -> Result<StatsReading> {
        let response: StatsResponse = self.get_json("/api/stats").await?;
        Ok(response.into_reading())
    }
}
