// Telemetry snapshot domain model
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Latest polled grill state. Replaced as a whole on every poll; nothing is
/// carried over from the previous snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TelemetrySnapshot {
    pub grill_set: Option<f64>,
    pub probe_set: Option<f64>,
    pub connected: Option<bool>,
    pub ambient_temp: Option<f64>,
    pub last_connected: Option<DateTime<Utc>>,
    pub session_start_time: Option<DateTime<Utc>>,
    pub cook_timer_remaining: Option<f64>,
    pub simulated: bool,
    pub idle: bool,
    pub stale: bool,
}

impl TelemetrySnapshot {
    pub fn display_mode(&self) -> DisplayMode {
        if self.stale {
            DisplayMode::Stale
        } else if self.idle && !self.simulated {
            DisplayMode::Idle
        } else {
            DisplayMode::Live
        }
    }
}

/// Which screen the surrounding application should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    Live,
    Idle,
    Stale,
}

/// Write-once cell for the session start: the first reported value wins
#[derive(Debug, Clone, Default)]
pub struct SessionStart {
    started_at: Option<DateTime<Utc>>,
}

impl SessionStart {
    /// Latch `candidate` if nothing has been captured yet. Returns true when
    /// this call captured it.
    pub fn offer(&mut self, candidate: Option<DateTime<Utc>>) -> bool {
        match (self.started_at, candidate) {
            (None, Some(start)) => {
                self.started_at = Some(start);
                true
            }
            _ => false,
        }
    }

    pub fn get(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }
}
