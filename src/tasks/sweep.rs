//! TTL Sweep Task
//!
//! Background task that periodically purges expired entries from every
//! cache domain. Lazy expiry in `get` already guarantees correctness;
//! the sweep only bounds memory when a domain is read rarely.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::DomainCache;

/// Spawns the periodic sweep over all cache domains.
///
/// The task sleeps for `interval` between runs and never blocks
/// foreground readers beyond each store's lock. The returned handle is
/// aborted during graceful shutdown.
pub fn spawn_sweep_task(cache: Arc<DomainCache>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_secs = interval.as_secs(), "starting cache sweep task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.sweep_all().await;

            if removed > 0 {
                info!(removed, "cache sweep purged expired entries");
            } else {
                debug!("cache sweep found nothing expired");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Domain;
    use serde_json::json;

    #[tokio::test]
    async fn test_sweep_task_removes_expired_entries() {
        let cache = Arc::new(DomainCache::new());

        cache
            .cache_in_with_ttl(Domain::Quiz, "short", json!(1), Duration::from_millis(20))
            .await;
        cache.cache_quiz("long", json!(2)).await;

        let handle = spawn_sweep_task(cache.clone(), Duration::from_millis(50));

        tokio::time::sleep(Duration::from_millis(120)).await;

        let stats = cache.stats().await;
        assert_eq!(stats.quiz.total_entries, 1);
        assert!(cache.get_cached_quiz("long").await.is_some());

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_can_be_aborted() {
        let cache = Arc::new(DomainCache::new());

        let handle = spawn_sweep_task(cache, Duration::from_secs(300));
        handle.abort();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(handle.is_finished());
    }
}
