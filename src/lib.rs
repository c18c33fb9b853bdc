//! ICN Content Store - an in-memory cache of Content Objects for a forwarder
//!
//! Exact-match lookup by name with LRU eviction, where expired content and
//! content past its recommended cache time are evicted ahead of the LRU tail.

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod message;
pub mod name;
pub mod tasks;

pub use cache::{ContentStore, ContentStoreStats, EvictionPolicy};
pub use clock::{ManualClock, MonotonicClock, TickClock};
pub use config::Config;
pub use error::{Result, StoreError};
pub use message::{CachedMessage, ContentObject, Expiry, MessageId, Ticks};
pub use name::{Name, NameComponent};
pub use tasks::{spawn_trim_task, SharedContentStore};
