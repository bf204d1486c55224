//! Control surface of the host's monitor scheduler.
//!
//! The router never runs checks itself. It only tells the scheduler which
//! monitors must be running, through [`MonitorScheduler`], which is handed to
//! the router at construction time.

mod local;
mod locks;

pub use local::{DueCheck, LocalScheduler};
pub use locks::MonitorLocks;

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DbErr};
use thiserror::Error;
use tracing::{error, info};

use crate::db::entities::monitor;
use crate::db::services::monitor_service;

#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("monitor {monitor_id} has an unusable interval of {interval}s")]
    InvalidInterval { monitor_id: i32, interval: i32 },
    #[error("scheduler unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait MonitorScheduler: Send + Sync {
    /// Starts (or restarts) the check task for `monitor` with its current settings.
    async fn start(&self, monitor: &monitor::Model) -> Result<(), SchedulerError>;

    /// Stops the check task; stopping a monitor that is not running is a no-op.
    async fn stop(&self, monitor_id: i32);

    fn is_running(&self, monitor_id: i32) -> bool;
}

/// Brings the scheduler in line with a persisted change from `previous` to
/// `current`.
///
/// An active monitor whose row changed in any way is stopped and started
/// again so the task never runs with stale settings. An unchanged row causes
/// no scheduler call.
pub async fn apply_transition(
    scheduler: &dyn MonitorScheduler,
    previous: &monitor::Model,
    current: &monitor::Model,
) -> Result<(), SchedulerError> {
    match (previous.active, current.active) {
        (true, false) => {
            scheduler.stop(current.id).await;
            Ok(())
        }
        (false, true) => scheduler.start(current).await,
        (true, true) if previous != current => {
            scheduler.stop(current.id).await;
            scheduler.start(current).await
        }
        _ => Ok(()),
    }
}

/// Starts every monitor persisted as active. Failures are logged per monitor
/// and do not prevent the others from starting.
pub async fn start_active_monitors(
    db: &DatabaseConnection,
    scheduler: &dyn MonitorScheduler,
) -> Result<usize, DbErr> {
    let monitors = monitor_service::list_active_monitors(db).await?;
    let mut started = 0;
    for monitor in &monitors {
        match scheduler.start(monitor).await {
            Ok(()) => started += 1,
            Err(e) => error!(monitor_id = monitor.id, error = %e, "Failed to start monitor at boot."),
        }
    }
    info!(started, total = monitors.len(), "Active monitors handed to the scheduler.");
    Ok(started)
}
