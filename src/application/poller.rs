// Background polling: one backlog load, then a fixed-cadence stats poll
use crate::application::monitor_service::MonitorService;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Handle to the running poll loop. Dropping it also stops the loop, but
/// only [`PollerHandle::shutdown`] waits for the task to finish.
pub struct PollerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            tracing::error!("Poller task failed: {}", e);
        }
    }
}

pub fn spawn_poller(service: MonitorService, every: Duration) -> PollerHandle {
    let (shutdown, mut stop) = watch::channel(false);

    let task = tokio::spawn(async move {
        // Backlog first so live samples land after it
        tokio::select! {
            result = service.load_history() => match result {
                Ok(count) => tracing::info!("History loaded, {} samples in log", count),
                Err(e) => tracing::warn!("{:#}", e),
            },
            _ = stop.changed() => return,
        }

        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match service.poll_once().await {
                        Ok(()) => {
                            let count = service.sample_count().await;
                            tracing::debug!("Poll applied, {} samples in log", count);
                        }
                        Err(e) => tracing::warn!("{:#}", e),
                    }
                }
                _ = stop.changed() => break,
            }
        }
        tracing::info!("Poller stopped");
    });

    PollerHandle { shutdown, task }
}
