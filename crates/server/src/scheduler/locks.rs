use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Serializes mutations of the same monitor across concurrent requests, so a
/// persisted `active` flag and the scheduler cannot be changed out of order.
#[derive(Clone, Default)]
pub struct MonitorLocks {
    inner: Arc<DashMap<i32, Arc<Mutex<()>>>>,
}

impl MonitorLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, monitor_id: i32) -> OwnedMutexGuard<()> {
        let mutex = self.inner.entry(monitor_id).or_default().clone();
        mutex.lock_owned().await
    }

    /// Drops the entry of a deleted monitor.
    pub fn forget(&self, monitor_id: i32) {
        self.inner.remove(&monitor_id);
    }
}
