//! Cache Module
//!
//! In-memory caching with TTL expiration and insertion-order eviction,
//! partitioned into the four domains the sync core serves.

mod domains;
mod entry;
mod fifo;
mod stats;
mod store;


// Re-export public types
pub use domains::{Domain, DomainCache, DomainCacheStats, QUIZ_ANALYTICS_CASCADE};
pub use entry::CacheEntry;
pub use fifo::FifoTracker;
pub use stats::CacheStats;
pub use store::ExpiringStore;
