// Source trait for backend telemetry access
use crate::domain::sample::Sample;
use crate::domain::telemetry::TelemetrySnapshot;
use async_trait::async_trait;

/// One `/api/stats` response: the current temperatures plus the snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsReading {
    pub grill_temp: Option<f64>,
    pub probe_temp: Option<f64>,
    pub snapshot: TelemetrySnapshot,
}

#[async_trait]
pub trait TelemetrySource: Send + Sync {
    /// Backlog recorded by the backend before this client started, oldest first
    async fn fetch_history(&self) -> anyhow::Result<Vec<Sample>>;

    /// Latest temperatures and grill state
    async fn fetch_stats(&self) -> anyhow::Result<StatsReading>;
}

#[cfg(test)]
pub mod fake {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted source: hands out queued stats responses in order, then
    /// repeats the last one
    #[derive(Default)]
    pub struct FakeSource {
        pub history: Mutex<Option<anyhow::Result<Vec<Sample>>>>,
        pub stats: Mutex<VecDeque<anyhow::Result<StatsReading>>>,
        last: Mutex<Option<StatsReading>>,
        pub history_calls: AtomicUsize,
        pub stats_calls: AtomicUsize,
    }

    impl FakeSource {
        pub fn with_history(samples: Vec<Sample>) -> Self {
            let source = Self::default();
            *source.history.lock().unwrap() = Some(Ok(samples));
            source
        }

        pub fn push_stats(&self, reading: anyhow::Result<StatsReading>) {
            self.stats.lock().unwrap().push_back(reading);
        }

        pub fn reading(grill: f64, probe: f64) -> StatsReading {
            StatsReading {
                grill_temp: Some(grill),
                probe_temp: Some(probe),
                snapshot: TelemetrySnapshot::default(),
            }
        }
    }

    #[async_trait]
    impl TelemetrySource for FakeSource {
        async fn fetch_history(&self) -> anyhow::Result<Vec<Sample>> {
            self.history_calls.fetch_add(1, Ordering::SeqCst);
            self.history.lock().unwrap().take().unwrap_or_else(|| Ok(Vec::new()))
        }

        async fn fetch_stats(&self) -> anyhow::Result<StatsReading> {
            self.stats_calls.fetch_add(1, Ordering::SeqCst);
            let next = self.stats.lock().unwrap().pop_front();
            match next {
                Some(Ok(reading)) => {
                    *self.last.lock().unwrap() = Some(reading.clone());
                    Ok(reading)
                }
                Some(Err(e)) => Err(e),
                None => match self.last.lock().unwrap().clone() {
                    Some(reading) => Ok(reading),
                    None => anyhow::bail!("backend unreachable"),
                },
            }
        }
    }
}
