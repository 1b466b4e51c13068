// Application state for HTTP handlers
use crate::application::monitor_service::MonitorService;
use crate::application::streaming_service::StreamingDashboardService;

#[derive(Clone)]
pub struct AppState {
    pub monitor_service: MonitorService,
    pub streaming_service: StreamingDashboardService,
}
