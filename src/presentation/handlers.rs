// HTTP request handlers
use crate::domain::chart::{AxisMode, ZoomEvent};
use crate::domain::dashboard::Dashboard;
use crate::domain::error::ControlError;
use crate::domain::monitor::MonitorEvent;
use crate::domain::sample::Channel;
use crate::domain::scope::Scope;
use crate::infrastructure::chunked_json::stream_from_receiver;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct ScopeRequest {
    pub scope: String,
}

#[derive(Deserialize)]
pub struct AxisModeRequest {
    pub mode: String,
}

#[derive(Deserialize, Default)]
pub struct ZoomRequest {
    #[serde(default)]
    pub x_range: Option<[f64; 2]>,
    #[serde(default)]
    pub y_range: Option<[f64; 2]>,
}

impl IntoResponse for ControlError {
    fn into_response(self) -> Response {
        tracing::debug!("Rejected control: {}", self);
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Current dashboard
pub async fn get_dashboard(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let dashboard = state.monitor_service.dashboard().await;
    dashboard_response(&dashboard, &headers).await
}

/// Live dashboard frames, one per refresh tick
pub async fn stream_dashboard(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let rx = state.streaming_service.stream_dashboard();
    stream_from_receiver(rx, accepts_brotli(&headers))
}

pub async fn set_scope(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<ScopeRequest>,
) -> Result<Response, ControlError> {
    let scope = Scope::parse(&request.scope)?;
    control(&state, &headers, MonitorEvent::ScopeSelected(scope)).await
}

pub async fn set_axis_mode(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<AxisModeRequest>,
) -> Result<Response, ControlError> {
    let mode = AxisMode::parse(&request.mode)?;
    control(&state, &headers, MonitorEvent::AxisModeSet(mode)).await
}

pub async fn toggle_axis_mode(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ControlError> {
    control(&state, &headers, MonitorEvent::AxisModeToggled).await
}

pub async fn zoom_chart(
    Path(channel): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<ZoomRequest>,
) -> Result<Response, ControlError> {
    let channel = parse_channel(&channel)?;
    let event = ZoomEvent {
        x_range: request.x_range,
        y_range: request.y_range,
    };
    control(&state, &headers, MonitorEvent::Zoomed { channel, event }).await
}

pub async fn reset_chart(
    Path(channel): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ControlError> {
    let channel = parse_channel(&channel)?;
    control(&state, &headers, MonitorEvent::ZoomReset(channel)).await
}

fn parse_channel(value: &str) -> Result<Channel, ControlError> {
    Channel::parse(value).ok_or_else(|| ControlError::UnknownChannel(value.to_string()))
}

async fn control(
    state: &AppState,
    headers: &HeaderMap,
    event: MonitorEvent,
) -> Result<Response, ControlError> {
    let dashboard = state.monitor_service.control(event).await?;
    Ok(dashboard_response(&dashboard, headers).await)
}

async fn dashboard_response(dashboard: &Dashboard, headers: &HeaderMap) -> Response {
    match json_response(dashboard, accepts_brotli(headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}
