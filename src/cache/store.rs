//! Content Store Module
//!
//! Exact-match cache combining a name table with a recency list and two
//! deadline indices. All four structures are updated together by every
//! public operation.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::cache::entry::ContentStoreEntry;
use crate::cache::lru::LruList;
use crate::cache::stats::{ContentStoreStats, EvictionReason};
use crate::cache::time_index::{ByExpiryTime, ByRecommendedCacheTime, TimeOrderedIndex};
use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::message::{CachedMessage, ContentObject, Ticks};
use crate::name::Name;

// == Eviction Policy ==
/// Which stale entries may be chosen before falling back to the LRU tail.
///
/// Victims are picked in order: expired entry, entry past its recommended
/// cache time, least recently used entry. Disabled steps are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EvictionPolicy {
    pub evict_expired: bool,
    pub evict_past_recommended_cache_time: bool,
}

impl Default for EvictionPolicy {
    fn default() -> Self {
        Self {
            evict_expired: true,
            evict_past_recommended_cache_time: true,
        }
    }
}

impl EvictionPolicy {
    /// Plain recency eviction.
    pub fn lru_only() -> Self {
        Self {
            evict_expired: false,
            evict_past_recommended_cache_time: false,
        }
    }
}

// == Index Sizes ==
/// Sizes of the store's internal structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexSizes {
    pub entries: usize,
    pub lru: usize,
    pub by_expiry: usize,
    pub by_recommended_cache_time: usize,
}

// == Content Store ==
/// In-memory content cache bounded by an object count.
#[derive(Debug)]
pub struct ContentStore<M = ContentObject> {
    /// Exact-match table, the owner of every entry
    entries: HashMap<Name, ContentStoreEntry<M>>,
    /// Recency order of the same entries
    lru: LruList<Name>,
    by_expiry: TimeOrderedIndex<ByExpiryTime>,
    by_recommended_cache_time: TimeOrderedIndex<ByRecommendedCacheTime>,
    /// Maximum number of entries
    capacity: usize,
    policy: EvictionPolicy,
    stats: ContentStoreStats,
    /// Largest `now` seen so far
    clock_high_water: Ticks,
}

impl<M: CachedMessage> ContentStore<M> {
    // == Constructors ==
    /// Creates a store with the default eviction policy.
    pub fn new(capacity: usize) -> Self {
        Self::with_policy(capacity, EvictionPolicy::default())
    }

    pub fn with_policy(capacity: usize, policy: EvictionPolicy) -> Self {
        info!(capacity, ?policy, "Content store created");

        Self {
            entries: HashMap::new(),
            lru: LruList::new(),
            by_expiry: TimeOrderedIndex::new(),
            by_recommended_cache_time: TimeOrderedIndex::new(),
            capacity,
            policy,
            stats: ContentStoreStats::new(),
            clock_high_water: 0,
        }
    }

    /// Creates a store from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::with_policy(config.capacity, config.eviction_policy())
    }

    // == Insert ==
    /// Caches `message`.
    ///
    /// An entry with the same name is replaced and the new one starts at the
    /// LRU head. At capacity, one victim is evicted first, so the store never
    /// grows past its limit.
    ///
    /// # Errors
    /// - `ZeroCapacity` if the limit is 0
    /// - `Expired` / `PastRecommendedCacheTime` if the message is already
    ///   stale at `now`
    ///
    /// A rejected insert leaves the cached entries untouched.
    pub fn insert(&mut self, message: Arc<M>, now: Ticks) -> Result<()> {
        self.observe(now);

        if let Err(err) = self.admit(message.as_ref(), now) {
            self.stats.record_rejected();
            debug!(error = %err, "Content store rejected message");
            return Err(err);
        }

        let name = message.name().clone();

        if self.purge(&name).is_some() {
            self.stats.record_replacement();
            debug!(%name, "Content store replacing entry with same name");
        }

        while self.entries.len() >= self.capacity {
            if self.evict_one(now).is_none() {
                break;
            }
        }

        let entry = ContentStoreEntry::new(message, Some(&mut self.lru));
        let indexed_expiry = self.by_expiry.add(&entry);
        let indexed_rct = self.by_recommended_cache_time.add(&entry);
        debug_assert_eq!(indexed_expiry, entry.has_expiry_time());
        debug_assert_eq!(indexed_rct, entry.has_recommended_cache_time());
        self.entries.insert(name.clone(), entry);
        self.stats.record_add();

        debug!(
            %name,
            object_count = self.entries.len(),
            "Content store saved message"
        );
        Ok(())
    }

    fn admit(&self, message: &M, now: Ticks) -> Result<()> {
        if self.capacity == 0 {
            return Err(StoreError::ZeroCapacity);
        }

        let expiry = message.expiry_time();
        if expiry.is_reached(now) {
            return Err(StoreError::Expired {
                name: message.name().clone(),
                expiry: expiry.ticks().unwrap_or(now),
                now,
            });
        }

        let recommended = message.recommended_cache_time();
        if recommended.is_reached(now) {
            return Err(StoreError::PastRecommendedCacheTime {
                name: message.name().clone(),
                recommended: recommended.ticks().unwrap_or(now),
                now,
            });
        }

        Ok(())
    }

    // == Find ==
    /// Exact-match lookup. A hit moves the entry to the LRU head.
    pub fn find(&mut self, name: &Name) -> Option<Arc<M>> {
        match self.entries.get(name) {
            Some(entry) => {
                entry.move_to_head(&mut self.lru);
                self.stats.record_hit();
                debug!(
                    %name,
                    hits = self.stats.hits,
                    misses = self.stats.misses,
                    "Content store matched"
                );
                Some(entry.acquire_message())
            }
            None => {
                self.stats.record_miss();
                debug!(
                    %name,
                    hits = self.stats.hits,
                    misses = self.stats.misses,
                    "Content store missed"
                );
                None
            }
        }
    }

    // == Serve ==
    /// Lookup on the Interest path, aware of deadlines.
    ///
    /// Expired content is dropped and not returned. Content past its
    /// recommended cache time is returned one last time, then dropped.
    pub fn serve(&mut self, name: &Name, now: Ticks) -> Option<Arc<M>> {
        self.observe(now);

        let (expired, past_rct) = match self.entries.get(name) {
            Some(entry) => (
                entry.is_expired(now),
                entry.is_past_recommended_cache_time(now),
            ),
            None => return self.find(name),
        };

        if expired {
            self.purge(name);
            self.stats.record_miss();
            self.stats.record_stale_removal();
            debug!(%name, now, "Content store dropped expired content on lookup");
            return None;
        }

        let message = self.find(name);

        if past_rct {
            self.purge(name);
            self.stats.record_stale_removal();
            debug!(%name, now, "Content store dropped content past recommended cache time");
        }

        message
    }

    // == Remove ==
    /// Removes the entry for `name`, returning its message.
    pub fn remove(&mut self, name: &Name) -> Option<Arc<M>> {
        let entry = self.purge(name)?;
        debug!(
            %name,
            object_count = self.entries.len(),
            "Content store removed message"
        );
        Some(entry.into_message())
    }

    // == Inspection ==
    /// True if `name` is cached. Does not touch recency.
    pub fn contains(&self, name: &Name) -> bool {
        self.entries.contains_key(name)
    }

    /// The entry for `name`, without touching recency.
    pub fn peek(&self, name: &Name) -> Option<&ContentStoreEntry<M>> {
        self.entries.get(name)
    }

    /// Names from most to least recently used.
    pub fn lru_order(&self) -> Vec<Name> {
        self.lru.iter().cloned().collect()
    }

    // == Limit ==
    /// Changes the capacity, evicting down to it if needed.
    ///
    /// Eviction here uses the largest tick the store has been given.
    pub fn set_limit(&mut self, limit: usize) {
        let previous = self.capacity;
        self.capacity = limit;

        let now = self.clock_high_water;
        let mut evicted = 0usize;
        while self.entries.len() > limit {
            if self.evict_one(now).is_none() {
                break;
            }
            evicted += 1;
        }

        info!(previous, limit, evicted, "Content store capacity changed");
    }

    pub fn limit(&self) -> usize {
        self.capacity
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    // == Trim ==
    /// Removes every entry whose ExpiryTime or RecommendedCacheTime has
    /// passed at `now`. Returns the number removed.
    pub fn trim(&mut self, now: Ticks) -> usize {
        self.observe(now);

        let mut removed = 0usize;

        while let Some(name) = self.by_expiry.oldest_passed(now).map(|(_, name)| name.clone()) {
            if self.purge(&name).is_none() {
                break;
            }
            removed += 1;
        }

        while let Some(name) = self
            .by_recommended_cache_time
            .oldest_passed(now)
            .map(|(_, name)| name.clone())
        {
            if self.purge(&name).is_none() {
                break;
            }
            removed += 1;
        }

        self.stats.record_trimmed(removed);

        if removed > 0 {
            info!(removed, now, remaining = self.entries.len(), "Content store trim");
        } else {
            debug!(now, "Content store trim: nothing stale");
        }
        removed
    }

    // == Clear ==
    /// Drops every entry. Returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();

        self.by_expiry.clear();
        self.by_recommended_cache_time.clear();
        self.lru.clear();
        self.entries.clear();

        info!(count, "Content store cleared");
        count
    }

    // == Size ==
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index_sizes(&self) -> IndexSizes {
        IndexSizes {
            entries: self.entries.len(),
            lru: self.lru.len(),
            by_expiry: self.by_expiry.len(),
            by_recommended_cache_time: self.by_recommended_cache_time.len(),
        }
    }

    // == Stats ==
    /// Returns current statistics.
    pub fn stats(&self) -> ContentStoreStats {
        let mut stats = self.stats.clone();
        stats.set_gauges(self.entries.len(), self.capacity);
        stats
    }

    /// Logs a one-line summary of the store.
    pub fn log_stats(&self) {
        let stats = &self.stats;
        info!(
            count = self.entries.len(),
            capacity = self.capacity,
            adds = stats.adds,
            hits = stats.hits,
            misses = stats.misses,
            lru_evictions = stats.lru_evictions,
            expiry_evictions = stats.expiry_evictions,
            rct_evictions = stats.rct_evictions,
            "Content store stats"
        );
    }

    /// Largest tick seen by `insert`, `serve` or `trim`.
    pub fn clock_high_water(&self) -> Ticks {
        self.clock_high_water
    }

    // == Internals ==
    fn observe(&mut self, now: Ticks) {
        self.clock_high_water = self.clock_high_water.max(now);
    }

    /// Unlinks the entry from the name table, both time indices and the
    /// recency list in one step.
    fn purge(&mut self, name: &Name) -> Option<ContentStoreEntry<M>> {
        let mut entry = self.entries.remove(name)?;
        self.by_expiry.remove(&entry);
        self.by_recommended_cache_time.remove(&entry);
        entry.detach(&mut self.lru);
        Some(entry)
    }

    fn select_victim(&self, now: Ticks) -> Option<(Name, EvictionReason)> {
        if self.policy.evict_expired {
            if let Some((_, name)) = self.by_expiry.oldest_passed(now) {
                return Some((name.clone(), EvictionReason::Expired));
            }
        }

        if self.policy.evict_past_recommended_cache_time {
            if let Some((_, name)) = self.by_recommended_cache_time.oldest_passed(now) {
                return Some((name.clone(), EvictionReason::PastRecommendedCacheTime));
            }
        }

        self.lru
            .peek_tail()
            .map(|name| (name.clone(), EvictionReason::LeastRecentlyUsed))
    }

    fn evict_one(&mut self, now: Ticks) -> Option<EvictionReason> {
        let (name, reason) = self.select_victim(now)?;
        self.purge(&name)?;

        let count = self.stats.record_eviction(reason);
        debug!(%name, ?reason, count, "Content store evicted message");
        Some(reason)
    }
}
