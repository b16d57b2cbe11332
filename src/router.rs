//! Update Router Module
//!
//! Pure mapping from inbound push-message types to domain cache
//! actions, executed synchronously on receipt. Push delivery and cache
//! invalidation are not ordered relative to each other, so the router
//! invalidates (forcing a fresh fetch) rather than trusting payloads —
//! except where an explicit overwrite is called out.

use std::sync::Arc;

use tracing::debug;

use crate::cache::{Domain, DomainCache};
use crate::channel::message::{inbound, PushMessage};

// == Routed Cache Keys ==
/// Analytics entry holding the open proctoring alerts list.
pub const ALERTS_KEY: &str = "proctoring/alerts";
/// Analytics entry for the live proctoring session.
pub const PROCTORING_SESSION_KEY: &str = "proctoring/session";
/// Analytics entry overwritten in place by `analytics_update`.
pub const SYSTEM_ANALYTICS_KEY: &str = "system";
/// Analytics entry for aggregate dashboard stats.
pub const DASHBOARD_STATS_KEY: &str = "dashboard_stats";
/// Quiz entry holding the full quiz list.
pub const QUIZ_LIST_KEY: &str = "list";
/// Quiz entry holding the currently-active quizzes.
pub const ACTIVE_QUIZZES_KEY: &str = "active";
/// User entry holding the notifications list.
pub const NOTIFICATIONS_KEY: &str = "notifications";

// == Update Router ==
/// Applies push messages to the domain cache.
pub struct UpdateRouter {
    cache: Arc<DomainCache>,
}

impl UpdateRouter {
    // == Constructor ==
    pub fn new(cache: Arc<DomainCache>) -> Self {
        Self { cache }
    }

    // == Dispatch ==
    /// Routes one push message to its cache action.
    ///
    /// Unknown types are a logged no-op: new server-side message types
    /// must never break older clients.
    pub async fn dispatch(&self, msg: &PushMessage) {
        match msg.kind.as_str() {
            inbound::PROCTORING_ALERT => {
                self.cache.invalidate_analytics(ALERTS_KEY).await;
            }
            inbound::ANALYTICS_UPDATE => {
                // Overwrite rather than invalidate: the payload carries
                // the fresh entry, saving a refetch round-trip.
                self.cache
                    .cache_analytics(SYSTEM_ANALYTICS_KEY, msg.data.clone())
                    .await;
            }
            inbound::QUIZ_UPDATE => {
                // List entries are not quiz ids, so plain domain
                // invalidation applies; no analytics cascade.
                self.cache.invalidate_in(Domain::Quiz, QUIZ_LIST_KEY).await;
                self.cache
                    .invalidate_in(Domain::Quiz, ACTIVE_QUIZZES_KEY)
                    .await;
            }
            inbound::EXAM_PROGRESS => {
                self.cache.invalidate_analytics(PROCTORING_SESSION_KEY).await;
            }
            inbound::NOTIFICATION => {
                self.cache.invalidate_user(NOTIFICATIONS_KEY).await;
            }
            inbound::DASHBOARD_STATS_UPDATE => {
                self.cache.invalidate_analytics(DASHBOARD_STATS_KEY).await;
            }
            other => {
                debug!(kind = other, "unrecognized push message type, ignoring");
            }
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn msg(kind: &str, data: serde_json::Value) -> PushMessage {
        PushMessage {
            kind: kind.to_string(),
            data,
        }
    }

    fn setup() -> (Arc<DomainCache>, UpdateRouter) {
        let cache = Arc::new(DomainCache::new());
        let router = UpdateRouter::new(cache.clone());
        (cache, router)
    }

    #[tokio::test]
    async fn test_proctoring_alert_invalidates_alerts() {
        let (cache, router) = setup();
        cache.cache_analytics(ALERTS_KEY, json!(["old"])).await;

        router.dispatch(&msg("proctoring_alert", json!({}))).await;

        assert_eq!(cache.get_cached_analytics(ALERTS_KEY).await, None);
    }

    #[tokio::test]
    async fn test_analytics_update_overwrites_in_place() {
        let (cache, router) = setup();
        cache
            .cache_analytics(SYSTEM_ANALYTICS_KEY, json!({"load": 1}))
            .await;

        router
            .dispatch(&msg("analytics_update", json!({"load": 2})))
            .await;

        // Overwritten, not invalidated.
        assert_eq!(
            cache.get_cached_analytics(SYSTEM_ANALYTICS_KEY).await,
            Some(json!({"load": 2}))
        );
    }

    #[tokio::test]
    async fn test_quiz_update_invalidates_lists() {
        let (cache, router) = setup();
        cache.cache_quiz(QUIZ_LIST_KEY, json!([1])).await;
        cache.cache_quiz(ACTIVE_QUIZZES_KEY, json!([2])).await;
        cache.cache_quiz("q1", json!("untouched")).await;

        router.dispatch(&msg("quiz_update", json!({}))).await;

        assert_eq!(cache.get_cached_quiz(QUIZ_LIST_KEY).await, None);
        assert_eq!(cache.get_cached_quiz(ACTIVE_QUIZZES_KEY).await, None);
        assert_eq!(cache.get_cached_quiz("q1").await, Some(json!("untouched")));
    }

    #[tokio::test]
    async fn test_exam_progress_invalidates_session() {
        let (cache, router) = setup();
        cache
            .cache_analytics(PROCTORING_SESSION_KEY, json!({"live": true}))
            .await;

        router.dispatch(&msg("exam_progress", json!({}))).await;

        assert_eq!(
            cache.get_cached_analytics(PROCTORING_SESSION_KEY).await,
            None
        );
    }

    #[tokio::test]
    async fn test_notification_invalidates_notifications() {
        let (cache, router) = setup();
        cache.cache_user(NOTIFICATIONS_KEY, json!(["n1"])).await;

        router.dispatch(&msg("notification", json!({}))).await;

        assert_eq!(cache.get_cached_user(NOTIFICATIONS_KEY).await, None);
    }

    #[tokio::test]
    async fn test_dashboard_stats_update_invalidates_stats() {
        let (cache, router) = setup();
        cache
            .cache_analytics(DASHBOARD_STATS_KEY, json!({"total": 5}))
            .await;

        router
            .dispatch(&msg("dashboard_stats_update", json!({})))
            .await;

        assert_eq!(cache.get_cached_analytics(DASHBOARD_STATS_KEY).await, None);
    }

    #[tokio::test]
    async fn test_unknown_type_changes_nothing() {
        let (cache, router) = setup();
        cache.cache_user("u1", json!(1)).await;
        cache.cache_quiz("q1", json!(2)).await;
        cache.cache_analytics("a1", json!(3)).await;
        cache.cache_question("c1", json!(4)).await;

        router.dispatch(&msg("totally_unknown", json!({}))).await;

        let stats = cache.stats().await;
        assert_eq!(stats.total_entries(), 4);
    }
}
