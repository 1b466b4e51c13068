// Dashboard domain model: the view the display paints each refresh
use super::chart::{AxisMode, ChartView};
use super::scope::Scope;
use super::telemetry::DisplayMode;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const UNIT_FAHRENHEIT: &str = "°F";

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub generated_at: DateTime<Utc>,
    pub mode: DisplayMode,
    pub simulated: bool,
    pub latest: LatestReadings,
    pub scope: ScopeView,
    pub axis_mode: AxisMode,
    pub tiles: Vec<StatTile>,
    pub charts: Vec<ChartView>,
    pub sample_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LatestReadings {
    pub grill: f64,
    pub probe: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScopeView {
    pub selected: Scope,
    pub options: Vec<ScopeOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScopeOption {
    pub value: Scope,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatTile {
    pub id: String,
    pub title: String,
    pub unit: String,
    pub value: f64,
    pub precision: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub std_dev: Option<f64>,
    /// Whether the tile follows the selected scope
    pub scoped: bool,
    pub details: Vec<TileDetail>,
}

impl StatTile {
    pub fn new(id: &str, title: &str, value: f64) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            unit: UNIT_FAHRENHEIT.to_string(),
            value,
            precision: 1,
            std_dev: None,
            scoped: false,
            details: Vec::new(),
        }
    }

    pub fn with_std_dev(mut self, std_dev: f64) -> Self {
        self.std_dev = Some(std_dev);
        self.scoped = true;
        self
    }

    pub fn detail(mut self, label: &str, value: impl Into<String>) -> Self {
        self.details.push(TileDetail {
            label: label.to_string(),
            value: value.into(),
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileDetail {
    pub label: String,
    pub value: String,
}

pub fn format_temp(value: f64) -> String {
    format!("{:.1}{}", value, UNIT_FAHRENHEIT)
}

/// Minutes and seconds with unbounded minutes, e.g. `135:07`
pub fn format_minutes_seconds(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total / 60, total % 60)
}
