//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with insertion-order
//! eviction and TTL expiration. None of the operations here can fail:
//! there is no I/O, and the capacity bound is enforced by evicting
//! before inserting.

use std::collections::HashMap;
use std::time::Duration;

use tracing::error;

use crate::cache::{CacheEntry, CacheStats, FifoTracker};

// == Expiring Store ==
/// Capacity-bounded key/value store with per-entry TTL.
///
/// Eviction is insertion-ordered: when the store is full, the entry that
/// was inserted earliest is dropped first. Reads never protect an entry
/// from eviction. Expiry is lazy; `get` purges an elapsed entry as a
/// side effect, and [`sweep`](Self::sweep) reclaims the rest.
#[derive(Debug)]
pub struct ExpiringStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Insertion-order tracker driving eviction
    order: FifoTracker,
    /// Performance counters
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
    /// TTL applied when the caller does not provide one
    default_ttl: Duration,
}

impl<V: Clone> ExpiringStore<V> {
    // == Constructor ==
    /// Creates a new store with the given capacity and default TTL.
    pub fn new(capacity: usize, default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            order: FifoTracker::new(),
            stats: CacheStats::new(),
            capacity,
            default_ttl,
        }
    }

    // == Set ==
    /// Stores a key-value pair with an optional TTL override.
    ///
    /// Overwriting an existing key resets its TTL and counts as a fresh
    /// insertion for eviction purposes. When the store is at capacity,
    /// the earliest-inserted entry is evicted before the insert.
    pub fn set(&mut self, key: String, value: V, ttl: Option<Duration>) {
        let is_overwrite = self.entries.contains_key(&key);

        if !is_overwrite && self.entries.len() >= self.capacity {
            if let Some(evicted) = self.order.evict_oldest() {
                self.entries.remove(&evicted);
                self.stats.record_eviction();
            }
        }

        let ttl = ttl.unwrap_or(self.default_ttl);
        self.entries.insert(key.clone(), CacheEntry::new(value, ttl));
        self.order.record(&key);
        self.stats.set_total_entries(self.entries.len());

        self.check_capacity_invariant();
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns the value if present and within its TTL. An elapsed entry
    /// is purged as a side effect and counted as a miss.
    pub fn get(&mut self, key: &str) -> Option<V> {
        match self.entries.get(key) {
            Some(entry) if entry.is_expired() => {
                self.entries.remove(key);
                self.order.remove(key);
                self.stats.set_total_entries(self.entries.len());
                self.stats.record_expiration();
                self.stats.record_miss();
                None
            }
            Some(entry) => {
                let value = entry.value.clone();
                self.stats.record_hit();
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Delete ==
    /// Removes an entry by key. No-op on absent keys.
    ///
    /// Returns whether an entry was actually removed.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.order.remove(key);
            self.stats.set_total_entries(self.entries.len());
        }
        removed
    }

    // == Clear ==
    /// Drops every entry in the store.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.stats.set_total_entries(0);
    }

    // == Sweep ==
    /// Purges all entries whose TTL has elapsed.
    ///
    /// Returns the number of entries removed. Intended to run on a
    /// periodic timer to bound memory on rarely-read stores; lazy expiry
    /// in `get` already guarantees correctness.
    pub fn sweep(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            self.entries.remove(&key);
            self.order.remove(&key);
            self.stats.record_expiration();
        }

        self.stats.set_total_entries(self.entries.len());
        count
    }

    // == Stats ==
    /// Returns a snapshot of the store's counters.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries in the store.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Capacity Invariant ==
    /// The entry count may never exceed the capacity bound. A violation
    /// is a programming error: loud in development builds, self-healing
    /// in release builds by clearing the store.
    fn check_capacity_invariant(&mut self) {
        debug_assert!(
            self.entries.len() <= self.capacity,
            "store holds {} entries, capacity is {}",
            self.entries.len(),
            self.capacity
        );

        if self.entries.len() > self.capacity {
            error!(
                entries = self.entries.len(),
                capacity = self.capacity,
                "capacity invariant violated, clearing store"
            );
            self.clear();
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    fn test_store() -> ExpiringStore<String> {
        ExpiringStore::new(100, Duration::from_secs(300))
    }

    #[test]
    fn test_store_new() {
        let store = test_store();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = test_store();

        store.set("key1".to_string(), "value1".to_string(), None);
        assert_eq!(store.get("key1"), Some("value1".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = test_store();
        assert_eq!(store.get("nonexistent"), None);
    }

    #[test]
    fn test_store_delete() {
        let mut store = test_store();

        store.set("key1".to_string(), "value1".to_string(), None);
        assert!(store.delete("key1"));

        assert!(store.is_empty());
        assert_eq!(store.get("key1"), None);
    }

    #[test]
    fn test_store_delete_nonexistent_is_noop() {
        let mut store = test_store();
        assert!(!store.delete("nonexistent"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_clear_on_empty_is_noop() {
        let mut store = test_store();
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = test_store();

        store.set("key1".to_string(), "value1".to_string(), None);
        store.set("key1".to_string(), "value2".to_string(), None);

        assert_eq!(store.get("key1"), Some("value2".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = test_store();

        store.set(
            "key1".to_string(),
            "value1".to_string(),
            Some(Duration::from_millis(50)),
        );

        assert!(store.get("key1").is_some());

        sleep(Duration::from_millis(80));

        assert_eq!(store.get("key1"), None);
        // Lazy expiry purged the entry as a side effect.
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_store_capacity_bound() {
        let mut store: ExpiringStore<String> =
            ExpiringStore::new(3, Duration::from_secs(300));

        store.set("key1".to_string(), "value1".to_string(), None);
        store.set("key2".to_string(), "value2".to_string(), None);
        store.set("key3".to_string(), "value3".to_string(), None);

        // At capacity: inserting key4 must evict key1 (earliest inserted).
        store.set("key4".to_string(), "value4".to_string(), None);

        assert_eq!(store.len(), 3);
        assert_eq!(store.get("key1"), None);
        assert!(store.get("key2").is_some());
        assert!(store.get("key3").is_some());
        assert!(store.get("key4").is_some());
    }

    #[test]
    fn test_store_reads_do_not_protect_from_eviction() {
        let mut store: ExpiringStore<String> =
            ExpiringStore::new(3, Duration::from_secs(300));

        store.set("key1".to_string(), "value1".to_string(), None);
        store.set("key2".to_string(), "value2".to_string(), None);
        store.set("key3".to_string(), "value3".to_string(), None);

        // A read of key1 does not refresh its insertion position.
        store.get("key1");
        store.set("key4".to_string(), "value4".to_string(), None);

        assert_eq!(store.get("key1"), None);
        assert!(store.get("key2").is_some());
    }

    #[test]
    fn test_store_overwrite_refreshes_insertion_position() {
        let mut store: ExpiringStore<String> =
            ExpiringStore::new(3, Duration::from_secs(300));

        store.set("key1".to_string(), "value1".to_string(), None);
        store.set("key2".to_string(), "value2".to_string(), None);
        store.set("key3".to_string(), "value3".to_string(), None);

        // Overwriting key1 makes key2 the eviction candidate.
        store.set("key1".to_string(), "fresh".to_string(), None);
        store.set("key4".to_string(), "value4".to_string(), None);

        assert!(store.get("key1").is_some());
        assert_eq!(store.get("key2"), None);
    }

    #[test]
    fn test_store_stats() {
        let mut store = test_store();

        store.set("key1".to_string(), "value1".to_string(), None);
        store.get("key1"); // hit
        store.get("nonexistent"); // miss

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }

    #[test]
    fn test_store_sweep() {
        let mut store = test_store();

        store.set(
            "short".to_string(),
            "value".to_string(),
            Some(Duration::from_millis(30)),
        );
        store.set(
            "long".to_string(),
            "value".to_string(),
            Some(Duration::from_secs(60)),
        );

        sleep(Duration::from_millis(60));

        let removed = store.sweep();
        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
        assert!(store.get("long").is_some());
        assert_eq!(store.stats().expirations, 1);
    }

    #[test]
    fn test_store_sweep_nothing_expired() {
        let mut store = test_store();
        store.set("key1".to_string(), "value1".to_string(), None);

        assert_eq!(store.sweep(), 0);
        assert_eq!(store.len(), 1);
    }
}
