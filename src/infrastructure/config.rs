use crate::domain::chart::ChartLayout;
use crate::domain::monitor::MonitorSettings;
use crate::domain::scope::{Scope, ScopeOptions};
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

const CONFIG_FILE: &str = "config/monitor";
const ENV_PREFIX: &str = "GRILL_MONITOR";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid listen address '{0}'")]
    ListenAddr(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct MonitorConfig {
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub polling: PollingSettings,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
    #[serde(default)]
    pub chart: ChartSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BackendSettings {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            request_timeout_secs: 5,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PollingSettings {
    pub interval_secs: u64,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self { interval_secs: 2 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub listen_addr: String,
    pub stream_interval_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            stream_interval_secs: 2,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DashboardSettings {
    pub scope_options: Vec<u32>,
    pub default_scope: String,
    pub rate_window_minutes: u32,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            scope_options: vec![5, 10, 30],
            default_scope: "10".to_string(),
            rate_window_minutes: 30,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ChartSettings {
    pub max_ticks: usize,
    pub y_buffer: f64,
    pub zoomed_nticks: u32,
    pub grill_dtick: f64,
    pub probe_dtick: f64,
}

impl Default for ChartSettings {
    fn default() -> Self {
        let layout = ChartLayout::default();
        Self {
            max_ticks: layout.max_ticks,
            y_buffer: layout.y_buffer,
            zoomed_nticks: layout.zoomed_nticks,
            grill_dtick: 30.0,
            probe_dtick: 15.0,
        }
    }
}

impl MonitorConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.polling.interval_secs)
    }

    pub fn stream_interval(&self) -> Duration {
        Duration::from_secs(self.server.stream_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.backend.request_timeout_secs)
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server
            .listen_addr
            .parse()
            .map_err(|_| ConfigError::ListenAddr(self.server.listen_addr.clone()))
    }

    /// Check cross-field constraints and build the monitor's settings
    pub fn monitor_settings(&self) -> Result<MonitorSettings, ConfigError> {
        if self.polling.interval_secs == 0 || self.server.stream_interval_secs == 0 {
            return Err(ConfigError::Invalid("intervals must be at least one second".into()));
        }
        if self.chart.max_ticks == 0 {
            return Err(ConfigError::Invalid("chart.max_ticks must be positive".into()));
        }
        if self.dashboard.rate_window_minutes == 0 {
            return Err(ConfigError::Invalid(
                "dashboard.rate_window_minutes must be positive".into(),
            ));
        }

        let scope_options = ScopeOptions::new(&self.dashboard.scope_options);
        let default_scope = Scope::parse(&self.dashboard.default_scope)
            .and_then(|scope| scope_options.validate(scope))
            .map_err(|e| ConfigError::Invalid(format!("dashboard.default_scope: {}", e)))?;

        Ok(MonitorSettings {
            scope_options,
            default_scope,
            rate_window: chrono::Duration::minutes(i64::from(self.dashboard.rate_window_minutes)),
            layout: ChartLayout {
                max_ticks: self.chart.max_ticks,
                y_buffer: self.chart.y_buffer,
                zoomed_nticks: self.chart.zoomed_nticks,
            },
            grill_dtick: self.chart.grill_dtick,
            probe_dtick: self.chart.probe_dtick,
        })
    }
}

/// Optional `config/monitor.{toml,...}` overlaid by `GRILL_MONITOR__*` env vars
pub fn load_monitor_config() -> Result<MonitorConfig, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(CONFIG_FILE).required(false))
        .add_source(env_overrides())
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// `GRILL_MONITOR__DASHBOARD__SCOPE_OPTIONS=5,15,60` style overrides
fn env_overrides() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("dashboard.scope_options")
        .try_parsing(true)
}
