use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::{MonitorScheduler, SchedulerError};
use crate::db::entities::monitor;

/// A check that came due, handed to whatever executes checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueCheck {
    pub monitor_id: i32,
    pub monitor_type: String,
    pub target: String,
}

/// In-process scheduler: one ticking task per running monitor, publishing a
/// [`DueCheck`] on every tick. Executing the check is up to the receiver.
pub struct LocalScheduler {
    tasks: DashMap<i32, JoinHandle<()>>,
    due_tx: mpsc::Sender<DueCheck>,
}

impl LocalScheduler {
    pub fn new(capacity: usize) -> (Arc<Self>, mpsc::Receiver<DueCheck>) {
        let (due_tx, due_rx) = mpsc::channel(capacity);
        let scheduler = Arc::new(Self {
            tasks: DashMap::new(),
            due_tx,
        });
        (scheduler, due_rx)
    }

    pub fn running_count(&self) -> usize {
        self.tasks.len()
    }
}

#[async_trait]
impl MonitorScheduler for LocalScheduler {
    async fn start(&self, monitor: &monitor::Model) -> Result<(), SchedulerError> {
        if monitor.interval <= 0 {
            return Err(SchedulerError::InvalidInterval {
                monitor_id: monitor.id,
                interval: monitor.interval,
            });
        }
        if self.due_tx.is_closed() {
            return Err(SchedulerError::Unavailable(
                "no consumer for due checks".to_string(),
            ));
        }

        let check = DueCheck {
            monitor_id: monitor.id,
            monitor_type: monitor.monitor_type.clone(),
            target: monitor.url.clone(),
        };
        let period = Duration::from_secs(monitor.interval as u64);
        let due_tx = self.due_tx.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                match due_tx.try_send(check.clone()) {
                    Ok(()) => debug!(monitor_id = check.monitor_id, "Check due."),
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        warn!(monitor_id = check.monitor_id, "Check executor is saturated; skipping tick.")
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => break,
                }
            }
        });

        if let Some(previous) = self.tasks.insert(monitor.id, handle) {
            previous.abort();
        }
        info!(monitor_id = monitor.id, interval = monitor.interval, "Monitor started.");
        Ok(())
    }

    async fn stop(&self, monitor_id: i32) {
        if let Some((_, handle)) = self.tasks.remove(&monitor_id) {
            handle.abort();
            info!(monitor_id, "Monitor stopped.");
        }
    }

    fn is_running(&self, monitor_id: i32) -> bool {
        self.tasks
            .get(&monitor_id)
            .is_some_and(|handle| !handle.is_finished())
    }
}
