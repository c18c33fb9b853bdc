//! Trim Task
//!
//! Background task that periodically drops stale content from a shared store.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::ContentStore;
use crate::clock::TickClock;
use crate::message::CachedMessage;

/// A content store shared between the forwarding path and background tasks.
pub type SharedContentStore<M> = Arc<RwLock<ContentStore<M>>>;

/// Spawns a background task that trims `store` every `interval`.
///
/// Each run reads the current tick from `clock`, takes the write lock and
/// removes every entry whose ExpiryTime or RecommendedCacheTime has passed.
///
/// # Arguments
/// * `store` - Shared content store
/// * `clock` - Source of the current tick
/// * `interval` - Time between trim runs
///
/// # Returns
/// A JoinHandle for the spawned task, used to abort it on shutdown.
pub fn spawn_trim_task<M, C>(
    store: SharedContentStore<M>,
    clock: Arc<C>,
    interval: Duration,
) -> JoinHandle<()>
where
    M: CachedMessage + Send + Sync + 'static,
    C: TickClock + 'static,
{
    tokio::spawn(async move {
        info!(interval_ms = interval.as_millis() as u64, "Starting content store trim task");

        loop {
            tokio::time::sleep(interval).await;

            let now = clock.now();
            let removed = {
                let mut guard = store.write().await;
                guard.trim(now)
            };

            if removed > 0 {
                info!(removed, now, "Trim task: removed stale content");
            } else {
                debug!(now, "Trim task: no stale content");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::message::ContentObject;
    use crate::name::Name;

    fn shared(capacity: usize) -> SharedContentStore<ContentObject> {
        Arc::new(RwLock::new(ContentStore::new(capacity)))
    }

    #[tokio::test]
    async fn test_trim_task_removes_stale_content() {
        let store = shared(10);
        let clock = Arc::new(ManualClock::new(0));

        {
            let mut guard = store.write().await;
            guard
                .insert(Arc::new(ContentObject::new("/expire/soon", "v").with_expiry_time(5)), 0)
                .unwrap();
            guard
                .insert(Arc::new(ContentObject::new("/hint", "v").with_recommended_cache_time(8)), 0)
                .unwrap();
            guard.insert(Arc::new(ContentObject::new("/keep", "v")), 0).unwrap();
        }

        let handle = spawn_trim_task(store.clone(), clock.clone(), Duration::from_millis(20));

        clock.set(10);
        tokio::time::sleep(Duration::from_millis(100)).await;

        {
            let guard = store.read().await;
            assert_eq!(guard.len(), 1);
            assert!(guard.contains(&Name::from_uri("/keep")));
            assert_eq!(guard.stats().trimmed, 2);
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_trim_task_preserves_fresh_content() {
        let store = shared(10);
        let clock = Arc::new(ManualClock::new(0));

        {
            let mut guard = store.write().await;
            guard
                .insert(Arc::new(ContentObject::new("/long/lived", "v").with_expiry_time(3600)), 0)
                .unwrap();
        }

        let handle = spawn_trim_task(store.clone(), clock.clone(), Duration::from_millis(20));

        clock.set(100);
        tokio::time::sleep(Duration::from_millis(80)).await;

        {
            let mut guard = store.write().await;
            assert!(guard.find(&Name::from_uri("/long/lived")).is_some());
            assert!(guard.clock_high_water() >= 100);
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_trim_task_can_be_aborted() {
        let store = shared(10);
        let clock = Arc::new(ManualClock::default());

        let handle = spawn_trim_task(store, clock, Duration::from_millis(10));
        handle.abort();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
