//! Content Store Statistics Module
//!
//! Tracks hits, misses, adds and evictions broken down by reason.

use serde::Serialize;

// == Eviction Reason ==
/// Why an entry was chosen as the eviction victim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionReason {
    /// Its ExpiryTime had passed
    Expired,
    /// Its RecommendedCacheTime had passed
    PastRecommendedCacheTime,
    /// It was the least recently used entry
    LeastRecentlyUsed,
}

// == Content Store Stats ==
/// Content store counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContentStoreStats {
    /// Messages linked into the store
    pub adds: u64,
    /// Adds that replaced an entry with the same name
    pub replacements: u64,
    /// Inserts refused (store disabled or content already stale)
    pub rejected: u64,
    /// Lookups that found an entry
    pub hits: u64,
    /// Lookups that found nothing
    pub misses: u64,
    /// Evictions of the LRU tail
    pub lru_evictions: u64,
    /// Evictions of an expired entry
    pub expiry_evictions: u64,
    /// Evictions of an entry past its recommended cache time
    pub rct_evictions: u64,
    /// Entries removed by trim passes
    pub trimmed: u64,
    /// Entries dropped on lookup because they had gone stale
    pub stale_removals: u64,
    /// Current number of entries
    pub total_entries: usize,
    /// Current capacity limit
    pub capacity: usize,
}

impl ContentStoreStats {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Total evictions across all reasons.
    pub fn evictions(&self) -> u64 {
        self.lru_evictions + self.expiry_evictions + self.rct_evictions
    }

    // == Recorders ==
    pub fn record_add(&mut self) {
        self.adds += 1;
    }

    pub fn record_replacement(&mut self) {
        self.replacements += 1;
    }

    pub fn record_rejected(&mut self) {
        self.rejected += 1;
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Increments the counter for `reason` and returns its new value.
    pub fn record_eviction(&mut self, reason: EvictionReason) -> u64 {
        let counter = match reason {
            EvictionReason::Expired => &mut self.expiry_evictions,
            EvictionReason::PastRecommendedCacheTime => &mut self.rct_evictions,
            EvictionReason::LeastRecentlyUsed => &mut self.lru_evictions,
        };
        *counter += 1;
        *counter
    }

    pub fn record_trimmed(&mut self, count: usize) {
        self.trimmed += count as u64;
    }

    pub fn record_stale_removal(&mut self) {
        self.stale_removals += 1;
    }

    /// Updates the size gauges.
    pub fn set_gauges(&mut self, total_entries: usize, capacity: usize) {
        self.total_entries = total_entries;
        self.capacity = capacity;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = ContentStoreStats::new();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.evictions(), 0);
        assert_eq!(stats.total_entries, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        let stats = ContentStoreStats::new();
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = ContentStoreStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_record_eviction_by_reason() {
        let mut stats = ContentStoreStats::new();

        assert_eq!(stats.record_eviction(EvictionReason::LeastRecentlyUsed), 1);
        assert_eq!(stats.record_eviction(EvictionReason::LeastRecentlyUsed), 2);
        assert_eq!(stats.record_eviction(EvictionReason::Expired), 1);
        assert_eq!(stats.record_eviction(EvictionReason::PastRecommendedCacheTime), 1);

        assert_eq!(stats.lru_evictions, 2);
        assert_eq!(stats.expiry_evictions, 1);
        assert_eq!(stats.rct_evictions, 1);
        assert_eq!(stats.evictions(), 4);
    }

    #[test]
    fn test_serializes_to_json() {
        let mut stats = ContentStoreStats::new();
        stats.record_add();
        stats.set_gauges(1, 10);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["adds"], 1);
        assert_eq!(json["total_entries"], 1);
        assert_eq!(json["capacity"], 10);
    }
}
