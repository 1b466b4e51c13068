// Chart axis engine: tick selection, label formatting and per-chart zoom state
use super::error::ControlError;
use super::sample::{Channel, Sample};
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use std::fmt::Display;

/// Span below which clock labels gain seconds
const CLOCK_SECONDS_SPAN_MS: i64 = 5 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisMode {
    /// Seconds since the first sample in the log
    #[default]
    Elapsed,
    /// Wall-clock time
    Clock,
}

impl AxisMode {
    pub fn parse(value: &str) -> Result<Self, ControlError> {
        match value {
            "elapsed" | "tss" => Ok(AxisMode::Elapsed),
            "clock" => Ok(AxisMode::Clock),
            other => Err(ControlError::UnknownAxisMode(other.to_string())),
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            AxisMode::Elapsed => AxisMode::Clock,
            AxisMode::Clock => AxisMode::Elapsed,
        }
    }

    pub fn axis_title(&self) -> &'static str {
        match self {
            AxisMode::Elapsed => "Time Since Start (MM:SS)",
            AxisMode::Clock => "Time (HH:MM)",
        }
    }

    /// x coordinate of a sample: seconds since `base` or epoch milliseconds
    fn x_of(&self, time: DateTime<Utc>, base: DateTime<Utc>) -> f64 {
        match self {
            AxisMode::Elapsed => (time - base).num_milliseconds() as f64 / 1000.0,
            AxisMode::Clock => time.timestamp_millis() as f64,
        }
    }
}

/// Layout constants shared by every chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub max_ticks: usize,
    pub y_buffer: f64,
    pub zoomed_nticks: u32,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            max_ticks: 6,
            y_buffer: 5.0,
            zoomed_nticks: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    pub value: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum XTicks {
    /// Discrete ticks at fixed sample indices
    Array { ticks: Vec<Tick> },
    /// Continuous ticking left to the renderer
    Auto { nticks: u32 },
}

/// Indices `0, k, 2k, ...` with a stride that keeps the count at or below `max_ticks`
pub fn tick_indices(len: usize, max_ticks: usize) -> impl Iterator<Item = usize> {
    let stride = len.div_ceil(max_ticks.max(1)).max(1);
    (0..len).step_by(stride)
}

/// `MM:SS`, or `HH:MM:SS` once past one hour
pub fn format_elapsed(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if total > 3600 {
        format!("{:02}:{:02}:{:02}", h, m, s)
    } else {
        format!("{:02}:{:02}", m, s)
    }
}

pub fn format_clock<Tz>(time: DateTime<Utc>, tz: &Tz, with_seconds: bool) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let local = time.with_timezone(tz);
    if with_seconds {
        local.format("%H:%M:%S").to_string()
    } else {
        local.format("%H:%M").to_string()
    }
}

/// Array ticks for the whole log in the given axis mode
pub fn array_ticks<Tz>(samples: &[Sample], mode: AxisMode, max_ticks: usize, tz: &Tz) -> Vec<Tick>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
        return Vec::new();
    };
    let with_seconds = (last.time - first.time).num_milliseconds() < CLOCK_SECONDS_SPAN_MS;

    tick_indices(samples.len(), max_ticks)
        .map(|i| {
            let time = samples[i].time;
            let value = mode.x_of(time, first.time);
            let label = match mode {
                AxisMode::Elapsed => format_elapsed(value),
                AxisMode::Clock => format_clock(time, tz, with_seconds),
            };
            Tick { value, label }
        })
        .collect()
}

/// Grid spacing for a zoomed y span
pub fn dtick_for_span(span: f64, default_dtick: f64) -> f64 {
    match span {
        s if s <= 10.0 => 1.0,
        s if s <= 20.0 => 2.0,
        s if s <= 40.0 => 5.0,
        s if s <= 80.0 => 10.0,
        _ => default_dtick,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomPhase {
    #[default]
    Auto,
    Zoomed,
}

/// Ranges reported by a pan/zoom interaction, in axis units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ZoomEvent {
    pub x_range: Option<[f64; 2]>,
    pub y_range: Option<[f64; 2]>,
}

impl ZoomEvent {
    pub fn validate(&self) -> Result<(), ControlError> {
        if self.x_range.is_none() && self.y_range.is_none() {
            return Err(ControlError::EmptyZoom);
        }
        for (axis, range) in [("x", self.x_range), ("y", self.y_range)] {
            if let Some([min, max]) = range {
                if !min.is_finite() || !max.is_finite() || min >= max {
                    return Err(ControlError::InvalidRange { axis, min, max });
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ZoomState {
    phase: ZoomPhase,
    x_range: Option<[f64; 2]>,
    y_range: Option<[f64; 2]>,
    y_dtick: Option<f64>,
}

impl ZoomState {
    pub fn phase(&self) -> ZoomPhase {
        self.phase
    }

    pub fn x_range(&self) -> Option<[f64; 2]> {
        self.x_range
    }

    pub fn y_range(&self) -> Option<[f64; 2]> {
        self.y_range
    }

    pub fn y_dtick(&self) -> Option<f64> {
        self.y_dtick
    }

    fn zoom(&mut self, event: ZoomEvent, default_dtick: f64) {
        self.phase = ZoomPhase::Zoomed;
        if let Some(x) = event.x_range {
            self.x_range = Some(x);
        }
        let dtick = match event.y_range {
            Some(y) => {
                self.y_range = Some(y);
                dtick_for_span(y[1] - y[0], default_dtick)
            }
            None => default_dtick,
        };
        self.y_dtick = Some(dtick);
    }

    /// Back to Auto; the y range and grid density of the last zoom survive
    fn reset(&mut self) {
        self.phase = ZoomPhase::Auto;
        self.x_range = None;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView {
    pub channel: Channel,
    pub title: &'static str,
    pub x_title: &'static str,
    pub points: Vec<[f64; 2]>,
    pub x_ticks: XTicks,
    pub x_range: Option<[f64; 2]>,
    pub y_range: Option<[f64; 2]>,
    pub y_dtick: f64,
    pub phase: ZoomPhase,
}

/// One channel's chart; grill and probe each own an instance
#[derive(Debug, Clone)]
pub struct ChartEngine {
    channel: Channel,
    default_dtick: f64,
    zoom: ZoomState,
}

impl ChartEngine {
    pub fn new(channel: Channel, default_dtick: f64) -> Self {
        Self {
            channel,
            default_dtick,
            zoom: ZoomState::default(),
        }
    }

    #[cfg(test)]
    pub fn zoom_state(&self) -> &ZoomState {
        &self.zoom
    }

    pub fn zoom(&mut self, event: ZoomEvent) -> Result<(), ControlError> {
        event.validate()?;
        self.zoom.zoom(event, self.default_dtick);
        tracing::debug!(
            channel = ?self.channel,
            dtick = ?self.zoom.y_dtick,
            "Chart zoomed"
        );
        Ok(())
    }

    pub fn reset(&mut self) {
        self.zoom.reset();
    }

    pub fn render<Tz>(
        &self,
        samples: &[Sample],
        mode: AxisMode,
        layout: &ChartLayout,
        tz: &Tz,
    ) -> ChartView
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let points: Vec<[f64; 2]> = match samples.first() {
            Some(first) => samples
                .iter()
                .map(|s| [mode.x_of(s.time, first.time), s.value(self.channel)])
                .collect(),
            None => Vec::new(),
        };

        let x_ticks = match self.zoom.phase() {
            ZoomPhase::Auto => XTicks::Array {
                ticks: array_ticks(samples, mode, layout.max_ticks, tz),
            },
            ZoomPhase::Zoomed => XTicks::Auto {
                nticks: layout.zoomed_nticks,
            },
        };

        let y_range = self
            .zoom
            .y_range()
            .or_else(|| padded_range(points.iter().map(|p| p[1]), layout.y_buffer));

        ChartView {
            channel: self.channel,
            title: self.channel.title(),
            x_title: mode.axis_title(),
            points,
            x_ticks,
            x_range: self.zoom.x_range(),
            y_range,
            y_dtick: self.zoom.y_dtick().unwrap_or(self.default_dtick),
            phase: self.zoom.phase(),
        }
    }
}

fn padded_range(values: impl Iterator<Item = f64>, buffer: f64) -> Option<[f64; 2]> {
    values.fold(None, |acc: Option<[f64; 2]>, v| match acc {
        None => Some([v, v]),
        Some([lo, hi]) => Some([lo.min(v), hi.max(v)]),
    })
    .map(|[lo, hi]| [lo - buffer, hi + buffer])
}
