//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A single cache entry: the stored value plus expiry metadata.
///
/// Entries are owned exclusively by the store that created them and are
/// never shared across domains.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Monotonic insertion timestamp
    pub stored_at: Instant,
    /// Time-to-live measured from `stored_at`
    pub ttl: Duration,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry stamped with the current time.
    pub fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            stored_at: Instant::now(),
            ttl,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has expired as of now.
    ///
    /// Boundary condition: an entry whose TTL has elapsed *exactly* is
    /// still present; it expires only once `now - stored_at > ttl`.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Checks expiry against an explicit clock reading.
    ///
    /// Split out from [`is_expired`](Self::is_expired) so the boundary can
    /// be tested deterministically.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) > self.ttl
    }

    // == Time To Live ==
    /// Returns the remaining TTL, saturating at zero once elapsed.
    pub fn ttl_remaining(&self) -> Duration {
        self.ttl
            .saturating_sub(self.stored_at.elapsed())
    }
}
