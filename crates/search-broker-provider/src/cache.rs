//! Short-lived instance cache
//!
//! Entries are keyed by `(name, plan_id)` and are never expired one by one.
//! A reaper task clears the whole store on a fixed interval, so a deleted
//! instance can still be served from the cache for up to one interval after
//! deprovision. Callers must tolerate that window.

use crate::instance::Instance;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Interval between wholesale clears
pub const DEFAULT_CACHE_INTERVAL: Duration = Duration::from_secs(5);

type CacheKey = (String, String);

/// Read-through cache shared by all callers of one provider
#[derive(Debug, Default)]
pub struct InstanceCache {
    entries: RwLock<HashMap<CacheKey, Instance>>,
}

impl InstanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str, plan_id: &str) -> Option<Instance> {
        self.read()
            .get(&(name.to_string(), plan_id.to_string()))
            .cloned()
    }

    pub fn put(&self, instance: &Instance) {
        let key = (instance.name.clone(), instance.plan.id.clone());
        self.write().insert(key, instance.clone());
    }

    /// Swap in an empty store. Readers see either the old map or the new one.
    pub fn clear_all(&self) {
        let stale = std::mem::take(&mut *self.write());
        if !stale.is_empty() {
            tracing::debug!("Cleared {} cached instance(s)", stale.len());
        }
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Start the periodic clear. Must be called from within a Tokio runtime.
    ///
    /// The task holds only a weak reference, so it also ends once the cache
    /// itself is dropped.
    pub fn spawn_reaper(self: &Arc<Self>, interval: Duration) -> CacheReaper {
        let cache: Weak<Self> = Arc::downgrade(self);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match cache.upgrade() {
                    Some(cache) => cache.clear_all(),
                    None => break,
                }
            }
        });
        CacheReaper { handle }
    }

    // A panic while holding the lock cannot leave the map half-written, so a
    // poisoned lock is still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<CacheKey, Instance>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<CacheKey, Instance>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// Handle to the periodic clear task. Stops the task when dropped.
#[derive(Debug)]
pub struct CacheReaper {
    handle: JoinHandle<()>,
}

impl CacheReaper {
    pub fn stop(&self) {
        self.handle.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for CacheReaper {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
