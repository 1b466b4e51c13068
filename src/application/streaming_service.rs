// Streaming dashboard service - Pushes a fresh dashboard frame every refresh tick
use crate::application::monitor_service::MonitorService;
use crate::domain::dashboard::Dashboard;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

const FRAME_BUFFER: usize = 4;

#[derive(Clone)]
pub struct StreamingDashboardService {
    monitor: MonitorService,
    refresh: Duration,
}

impl StreamingDashboardService {
    pub fn new(monitor: MonitorService, refresh: Duration) -> Self {
        Self { monitor, refresh }
    }

    /// Frames stop when the receiver is dropped
    pub fn stream_dashboard(&self) -> mpsc::Receiver<Dashboard> {
        let (tx, rx) = mpsc::channel(FRAME_BUFFER);
        let monitor = self.monitor.clone();
        let refresh = self.refresh;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(refresh);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut frames = 0usize;

            loop {
                ticker.tick().await;
                let dashboard = monitor.dashboard().await;
                if tx.send(dashboard).await.is_err() {
                    break;
                }
                frames += 1;
            }
            tracing::debug!("Dashboard stream closed after {} frames", frames);
        });

        rx
    }
}
