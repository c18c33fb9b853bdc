//! Cache Module
//!
//! The content store and the structures it keeps consistent: the name table,
//! the recency list and the two deadline indices.

mod entry;
mod lru;
mod stats;
mod store;
mod time_index;


// Re-export public types
pub use entry::ContentStoreEntry;
pub use lru::{LruHandle, LruList};
pub use stats::{ContentStoreStats, EvictionReason};
pub use store::{ContentStore, EvictionPolicy, IndexSizes};
pub use time_index::{ByExpiryTime, ByRecommendedCacheTime, TimeDimension, TimeKey, TimeOrderedIndex};
