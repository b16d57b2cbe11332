//! Domain Cache Facade Module
//!
//! Exposes one expiring store per cache domain (user, quiz, analytics,
//! question) with domain-appropriate TTLs and capacities, plus the
//! cross-domain invalidation cascade from quizzes to their derived
//! analytics entries.
//!
//! The facade is process-wide shared state: construct one `DomainCache`
//! at startup, wrap it in an `Arc`, and inject it by reference into the
//! request-handling layer and the push channel router.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::cache::{CacheStats, ExpiringStore};

// == Domains ==
/// A logical cache partition keyed by entity kind.
///
/// A key is unique within a domain; identical ids in different domains
/// never collide because every domain owns a separate store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    User,
    Quiz,
    Analytics,
    Question,
}

impl Domain {
    /// All domains, in a fixed order.
    pub const ALL: [Domain; 4] = [
        Domain::User,
        Domain::Quiz,
        Domain::Analytics,
        Domain::Question,
    ];

    /// The key-namespace prefix for this domain.
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::User => "user",
            Domain::Quiz => "quiz",
            Domain::Analytics => "analytics",
            Domain::Question => "question",
        }
    }

    /// Default TTL applied to entries cached in this domain.
    pub fn default_ttl(&self) -> Duration {
        match self {
            Domain::User => Duration::from_secs(600),
            Domain::Quiz => Duration::from_secs(300),
            Domain::Analytics => Duration::from_secs(900),
            Domain::Question => Duration::from_secs(1800),
        }
    }

    /// Capacity bound for this domain's store.
    pub fn capacity(&self) -> usize {
        match self {
            Domain::User => 500,
            Domain::Quiz => 200,
            Domain::Analytics => 300,
            Domain::Question => 1000,
        }
    }
}

// == Invalidation Edges ==
/// Analytics entry kinds derived from a quiz. Invalidating a quiz also
/// invalidates the analytics id `"{kind}:{quiz_id}"` for each kind here.
/// The edge set is fixed at compile time and acyclic.
pub const QUIZ_ANALYTICS_CASCADE: [&str; 4] = [
    "dashboard",
    "performance",
    "question_analysis",
    "student_performance",
];

// == Facade Stats ==
/// Per-domain counter snapshot for observability.
#[derive(Debug, Clone, Serialize)]
pub struct DomainCacheStats {
    /// When the snapshot was taken
    pub captured_at: DateTime<Utc>,
    pub user: CacheStats,
    pub quiz: CacheStats,
    pub analytics: CacheStats,
    pub question: CacheStats,
}

impl DomainCacheStats {
    /// Total entries across every domain.
    pub fn total_entries(&self) -> usize {
        self.user.total_entries
            + self.quiz.total_entries
            + self.analytics.total_entries
            + self.question.total_entries
    }
}

// == Domain Cache ==
/// One expiring store per domain, each behind its own lock.
///
/// Lock granularity is per-store: contention is low and the critical
/// sections are sub-microsecond, so a single lock per domain suffices.
#[derive(Debug)]
pub struct DomainCache {
    user: RwLock<ExpiringStore<Value>>,
    quiz: RwLock<ExpiringStore<Value>>,
    analytics: RwLock<ExpiringStore<Value>>,
    question: RwLock<ExpiringStore<Value>>,
}

impl Default for DomainCache {
    fn default() -> Self {
        Self::new()
    }
}

impl DomainCache {
    // == Constructor ==
    /// Creates the facade with every domain at its default TTL and
    /// capacity.
    pub fn new() -> Self {
        let store = |d: Domain| RwLock::new(ExpiringStore::new(d.capacity(), d.default_ttl()));
        Self {
            user: store(Domain::User),
            quiz: store(Domain::Quiz),
            analytics: store(Domain::Analytics),
            question: store(Domain::Question),
        }
    }

    fn store(&self, domain: Domain) -> &RwLock<ExpiringStore<Value>> {
        match domain {
            Domain::User => &self.user,
            Domain::Quiz => &self.quiz,
            Domain::Analytics => &self.analytics,
            Domain::Question => &self.question,
        }
    }

    /// Builds the namespaced store key for an id within a domain.
    fn key(domain: Domain, id: &str) -> String {
        format!("{}:{}", domain.as_str(), id)
    }

    // == Generic Operations ==
    /// Caches a value in a domain under its default TTL.
    pub async fn cache_in(&self, domain: Domain, id: &str, value: Value) {
        self.store(domain)
            .write()
            .await
            .set(Self::key(domain, id), value, None);
    }

    /// Caches a value in a domain with an explicit TTL.
    pub async fn cache_in_with_ttl(&self, domain: Domain, id: &str, value: Value, ttl: Duration) {
        self.store(domain)
            .write()
            .await
            .set(Self::key(domain, id), value, Some(ttl));
    }

    /// Reads a cached value from a domain.
    ///
    /// Takes the write lock: lazy expiry and the hit/miss counters both
    /// mutate the store.
    pub async fn get_cached(&self, domain: Domain, id: &str) -> Option<Value> {
        self.store(domain).write().await.get(&Self::key(domain, id))
    }

    /// Invalidates a single entry in a domain. No cross-domain cascade.
    pub async fn invalidate_in(&self, domain: Domain, id: &str) {
        self.store(domain)
            .write()
            .await
            .delete(&Self::key(domain, id));
    }

    // == Batch Helpers ==
    /// Caches a batch of entries in one domain under one lock
    /// acquisition.
    pub async fn cache_many(&self, domain: Domain, entries: Vec<(String, Value)>) {
        let mut store = self.store(domain).write().await;
        for (id, value) in entries {
            store.set(Self::key(domain, &id), value, None);
        }
    }

    /// Reads a batch of entries from one domain. The result is
    /// positional: `result[i]` corresponds to `ids[i]`.
    pub async fn get_many(&self, domain: Domain, ids: &[&str]) -> Vec<Option<Value>> {
        let mut store = self.store(domain).write().await;
        ids.iter()
            .map(|id| store.get(&Self::key(domain, id)))
            .collect()
    }

    // == User Domain ==
    pub async fn cache_user(&self, id: &str, value: Value) {
        self.cache_in(Domain::User, id, value).await;
    }

    pub async fn get_cached_user(&self, id: &str) -> Option<Value> {
        self.get_cached(Domain::User, id).await
    }

    pub async fn invalidate_user(&self, id: &str) {
        self.invalidate_in(Domain::User, id).await;
    }

    // == Quiz Domain ==
    pub async fn cache_quiz(&self, id: &str, value: Value) {
        self.cache_in(Domain::Quiz, id, value).await;
    }

    pub async fn get_cached_quiz(&self, id: &str) -> Option<Value> {
        self.get_cached(Domain::Quiz, id).await
    }

    /// Invalidates a quiz and every analytics entry derived from it.
    ///
    /// The cascade holds regardless of population order: analytics
    /// entries written after the quiz was cached are still removed.
    pub async fn invalidate_quiz(&self, id: &str) {
        self.invalidate_in(Domain::Quiz, id).await;

        let mut analytics = self.analytics.write().await;
        for kind in QUIZ_ANALYTICS_CASCADE {
            let derived = format!("{}:{}", kind, id);
            analytics.delete(&Self::key(Domain::Analytics, &derived));
        }
    }

    // == Analytics Domain ==
    pub async fn cache_analytics(&self, id: &str, value: Value) {
        self.cache_in(Domain::Analytics, id, value).await;
    }

    pub async fn get_cached_analytics(&self, id: &str) -> Option<Value> {
        self.get_cached(Domain::Analytics, id).await
    }

    pub async fn invalidate_analytics(&self, id: &str) {
        self.invalidate_in(Domain::Analytics, id).await;
    }

    // == Question Domain ==
    pub async fn cache_question(&self, id: &str, value: Value) {
        self.cache_in(Domain::Question, id, value).await;
    }

    pub async fn get_cached_question(&self, id: &str) -> Option<Value> {
        self.get_cached(Domain::Question, id).await
    }

    pub async fn invalidate_question(&self, id: &str) {
        self.invalidate_in(Domain::Question, id).await;
    }

    // == Maintenance ==
    /// Returns per-domain counter snapshots.
    pub async fn stats(&self) -> DomainCacheStats {
        DomainCacheStats {
            captured_at: Utc::now(),
            user: self.user.read().await.stats(),
            quiz: self.quiz.read().await.stats(),
            analytics: self.analytics.read().await.stats(),
            question: self.question.read().await.stats(),
        }
    }

    /// Resets every domain. Full-flush scenarios only.
    pub async fn clear_all(&self) {
        for domain in Domain::ALL {
            self.store(domain).write().await.clear();
        }
    }

    /// Purges elapsed entries from every domain.
    ///
    /// Returns the total number of entries removed.
    pub async fn sweep_all(&self) -> usize {
        let mut removed = 0;
        for domain in Domain::ALL {
            removed += self.store(domain).write().await.sweep();
        }
        removed
    }
}
