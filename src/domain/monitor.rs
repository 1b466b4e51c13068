// Monitor state: the single owner of the sample log, snapshot and view controls
use super::chart::{AxisMode, ChartEngine, ChartLayout, ZoomEvent};
use super::dashboard::{
    format_minutes_seconds, format_temp, Dashboard, LatestReadings, ScopeOption, ScopeView,
    StatTile,
};
use super::error::ControlError;
use super::sample::{Channel, Ingest, Sample, SampleLog};
use super::scope::{select_recent, Scope, ScopeOptions};
use super::statistics::{rate_per_minute, ChannelStats};
use super::telemetry::{SessionStart, TelemetrySnapshot};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::fmt::Display;

#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub scope_options: ScopeOptions,
    pub default_scope: Scope,
    pub rate_window: Duration,
    pub layout: ChartLayout,
    pub grill_dtick: f64,
    pub probe_dtick: f64,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            scope_options: ScopeOptions::default(),
            default_scope: Scope::Minutes(10),
            rate_window: Duration::minutes(30),
            layout: ChartLayout::default(),
            grill_dtick: 30.0,
            probe_dtick: 15.0,
        }
    }
}

/// Every state transition the monitor accepts
#[derive(Debug, Clone)]
pub enum MonitorEvent {
    /// Backlog loaded at startup
    HistoryLoaded(Vec<Sample>),
    /// One live poll: the reading (if the backend sent both temperatures)
    /// and the snapshot that replaces the previous one
    Polled {
        reading: Option<Sample>,
        snapshot: TelemetrySnapshot,
    },
    ScopeSelected(Scope),
    AxisModeSet(AxisMode),
    AxisModeToggled,
    Zoomed { channel: Channel, event: ZoomEvent },
    ZoomReset(Channel),
}

#[derive(Debug, Clone)]
pub struct MonitorState {
    settings: MonitorSettings,
    log: SampleLog,
    snapshot: TelemetrySnapshot,
    session_start: SessionStart,
    scope: Scope,
    axis_mode: AxisMode,
    grill_chart: ChartEngine,
    probe_chart: ChartEngine,
}

impl MonitorState {
    pub fn new(settings: MonitorSettings) -> Self {
        Self {
            log: SampleLog::new(),
            snapshot: TelemetrySnapshot::default(),
            session_start: SessionStart::default(),
            scope: settings.default_scope,
            axis_mode: AxisMode::default(),
            grill_chart: ChartEngine::new(Channel::Grill, settings.grill_dtick),
            probe_chart: ChartEngine::new(Channel::Probe, settings.probe_dtick),
            settings,
        }
    }

    pub fn apply(&mut self, event: MonitorEvent) -> Result<(), ControlError> {
        match event {
            MonitorEvent::HistoryLoaded(samples) => {
                let offered = samples.len();
                let accepted = samples
                    .into_iter()
                    .filter(|s| self.log.ingest(*s) != Ingest::Rejected)
                    .count();
                tracing::info!("Loaded {} of {} history samples", accepted, offered);
            }
            MonitorEvent::Polled { reading, snapshot } => {
                if let Some(sample) = reading {
                    self.log.ingest(sample);
                }
                if self.session_start.offer(snapshot.session_start_time) {
                    tracing::info!("Session started at {:?}", self.session_start.get());
                }
                self.snapshot = snapshot;
            }
            MonitorEvent::ScopeSelected(scope) => {
                self.scope = self.settings.scope_options.validate(scope)?;
            }
            MonitorEvent::AxisModeSet(mode) => self.axis_mode = mode,
            MonitorEvent::AxisModeToggled => self.axis_mode = self.axis_mode.toggled(),
            MonitorEvent::Zoomed { channel, event } => self.chart_mut(channel).zoom(event)?,
            MonitorEvent::ZoomReset(channel) => self.chart_mut(channel).reset(),
        }
        Ok(())
    }

    fn chart_mut(&mut self, channel: Channel) -> &mut ChartEngine {
        match channel {
            Channel::Grill => &mut self.grill_chart,
            Channel::Probe => &mut self.probe_chart,
        }
    }

    pub fn chart(&self, channel: Channel) -> &ChartEngine {
        match channel {
            Channel::Grill => &self.grill_chart,
            Channel::Probe => &self.probe_chart,
        }
    }

    pub fn samples(&self) -> &[Sample] {
        self.log.samples()
    }

    /// Statistics and charts for one render, all read from the same log state
    pub fn dashboard<Tz>(&self, now: DateTime<Utc>, tz: &Tz) -> Dashboard
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let samples = self.log.samples();
        let scoped = self.scope.select(samples, now);
        let rate_window = select_recent(samples, now, self.settings.rate_window);

        let latest = self
            .log
            .latest()
            .map(|s| LatestReadings {
                grill: s.grill_temp,
                probe: s.probe_temp,
            })
            .unwrap_or_default();

        let tiles = self.stat_tiles(scoped, rate_window, latest, now, tz);

        let charts = Channel::ALL
            .iter()
            .map(|channel| {
                self.chart(*channel)
                    .render(samples, self.axis_mode, &self.settings.layout, tz)
            })
            .collect();

        Dashboard {
            generated_at: now,
            mode: self.snapshot.display_mode(),
            simulated: self.snapshot.simulated,
            latest,
            scope: ScopeView {
                selected: self.scope,
                options: self
                    .settings
                    .scope_options
                    .iter()
                    .map(|scope| ScopeOption {
                        value: *scope,
                        label: scope.label(),
                    })
                    .collect(),
            },
            axis_mode: self.axis_mode,
            tiles,
            charts,
            sample_count: samples.len(),
        }
    }

    fn stat_tiles<Tz>(
        &self,
        scoped: &[Sample],
        rate_window: &[Sample],
        latest: LatestReadings,
        now: DateTime<Utc>,
        tz: &Tz,
    ) -> Vec<StatTile>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let snapshot = &self.snapshot;
        let grill = ChannelStats::of(scoped, Channel::Grill);
        let probe = ChannelStats::of(scoped, Channel::Probe);

        let mut grill_tile =
            StatTile::new("avg_grill", "Avg Grill Temp", grill.mean).with_std_dev(grill.std_dev);
        if let Some(set) = snapshot.grill_set {
            grill_tile = grill_tile.detail("Setpoint", format_temp(set));
        }

        let mut probe_tile =
            StatTile::new("avg_probe", "Avg Probe Temp", probe.mean).with_std_dev(probe.std_dev);
        if let Some(set) = snapshot.probe_set {
            probe_tile = probe_tile
                .detail("Setpoint", format_temp(set))
                .detail("Delta", format_temp(set - latest.probe));
        }
        if let Some(start) = self.session_start.get() {
            let elapsed = (now - start).num_milliseconds() as f64 / 1000.0;
            probe_tile = probe_tile.detail("Elapsed", format_minutes_seconds(elapsed));
        }

        let rate_minutes = self.settings.rate_window.num_minutes();
        let mut rate_tile = StatTile::new(
            "probe_rate",
            &format!("Δ Probe / Min ({}m)", rate_minutes),
            rate_per_minute(rate_window, Channel::Probe),
        );
        if let Some(remaining) = snapshot.cook_timer_remaining {
            let minutes = (remaining / 60.0).round();
            rate_tile = rate_tile.detail("Timer Left", format!("{} min", minutes));
        }
        if let Some(ambient) = snapshot.ambient_temp {
            rate_tile = rate_tile.detail("Ambient", format_temp(ambient));
        }
        if let Some(connected) = snapshot.connected {
            rate_tile = rate_tile.detail("Connected", if connected { "Yes" } else { "No" });
        }
        if let Some(last) = snapshot.last_connected {
            rate_tile = rate_tile.detail(
                "Last Connected",
                last.with_timezone(tz).format("%Y-%m-%d %H:%M:%S").to_string(),
            );
        }

        vec![grill_tile, probe_tile, rate_tile]
    }
}
