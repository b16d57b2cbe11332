//! Insertion-Order Tracker Module
//!
//! Tracks insertion order for FIFO eviction. Reads do not refresh an
//! entry's position; only a (re-)insertion does. The caches here are
//! read-heavy and short-lived, so FIFO approximates LRU closely enough,
//! and the public contract allows upgrading to true recency tracking.

use std::collections::VecDeque;

// == FIFO Tracker ==
/// Tracks key insertion order for eviction decisions.
///
/// Keys are stored in a VecDeque where:
/// - Back = most recently inserted
/// - Front = earliest inserted (next eviction candidate)
#[derive(Debug, Default)]
pub struct FifoTracker {
    /// Keys ordered by insertion time
    order: VecDeque<String>,
}

impl FifoTracker {
    // == Constructor ==
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Record ==
    /// Records an insertion for a key (moves it to the back).
    ///
    /// Overwriting an existing key counts as a fresh insertion.
    pub fn record(&mut self, key: &str) {
        self.remove(key);
        self.order.push_back(key.to_string());
    }

    // == Remove ==
    /// Removes a key from the tracker. No-op for untracked keys.
    pub fn remove(&mut self, key: &str) {
        self.order.retain(|k| k != key);
    }

    // == Evict Oldest ==
    /// Returns and removes the earliest-inserted key.
    ///
    /// Returns None if the tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<String> {
        self.order.pop_front()
    }

    // == Peek Oldest ==
    /// Returns the earliest-inserted key without removing it.
    pub fn peek_oldest(&self) -> Option<&String> {
        self.order.front()
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    // == Clear ==
    /// Drops all tracked keys.
    pub fn clear(&mut self) {
        self.order.clear();
    }

    // == Contains ==
    /// Checks if a key is being tracked.
    #[allow(dead_code)]
    pub fn contains(&self, key: &str) -> bool {
        self.order.iter().any(|k| k == key)
    }
}
