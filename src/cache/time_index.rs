//! Time Ordered Index Module
//!
//! Orders store entries by one deadline so the oldest can be found without a scan.

use std::collections::BTreeSet;
use std::fmt;
use std::marker::PhantomData;

use crate::cache::entry::ContentStoreEntry;
use crate::message::{CachedMessage, Expiry, MessageId, Ticks};
use crate::name::Name;

// == Time Dimension ==
/// Selects which deadline of an entry an index is keyed by.
pub trait TimeDimension {
    /// Label used in logs.
    const LABEL: &'static str;

    fn deadline<M: CachedMessage>(entry: &ContentStoreEntry<M>) -> Expiry;
}

/// Index by ExpiryTime.
#[derive(Debug, Clone, Copy)]
pub enum ByExpiryTime {}

/// Index by RecommendedCacheTime.
#[derive(Debug, Clone, Copy)]
pub enum ByRecommendedCacheTime {}

impl TimeDimension for ByExpiryTime {
    const LABEL: &'static str = "expiry";

    fn deadline<M: CachedMessage>(entry: &ContentStoreEntry<M>) -> Expiry {
        entry.expiry_time()
    }
}

impl TimeDimension for ByRecommendedCacheTime {
    const LABEL: &'static str = "recommended-cache-time";

    fn deadline<M: CachedMessage>(entry: &ContentStoreEntry<M>) -> Expiry {
        entry.recommended_cache_time()
    }
}

// == Time Key ==
/// Index key: deadline first, message identity second, name last.
///
/// Names are unique within a store, so two live entries never share a key
/// even if their messages report the same identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeKey {
    pub ticks: Ticks,
    pub id: MessageId,
    pub name: Name,
}

impl TimeKey {
    /// Builds the key for `entry` in dimension `D`, None if the entry has no
    /// deadline in that dimension.
    pub fn of<D: TimeDimension, M: CachedMessage>(entry: &ContentStoreEntry<M>) -> Option<Self> {
        D::deadline(entry).ticks().map(|ticks| TimeKey {
            ticks,
            id: entry.message().id(),
            name: entry.name().clone(),
        })
    }
}

// == Time Ordered Index ==
/// Ordered set of entries for one time dimension.
///
/// The key carries the entry name so the owner can find the entry in its
/// hash table. Add, remove and oldest are O(log n).
pub struct TimeOrderedIndex<D> {
    entries: BTreeSet<TimeKey>,
    _dimension: PhantomData<D>,
}

impl<D> Default for TimeOrderedIndex<D> {
    fn default() -> Self {
        Self {
            entries: BTreeSet::new(),
            _dimension: PhantomData,
        }
    }
}

impl<D> fmt::Debug for TimeOrderedIndex<D>
where
    D: TimeDimension,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimeOrderedIndex")
            .field("dimension", &D::LABEL)
            .field("len", &self.entries.len())
            .finish()
    }
}

impl<D: TimeDimension> TimeOrderedIndex<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `entry`. Returns false if it has no deadline in this dimension or
    /// is already present.
    pub fn add<M: CachedMessage>(&mut self, entry: &ContentStoreEntry<M>) -> bool {
        TimeKey::of::<D, M>(entry)
            .map(|key| self.entries.insert(key))
            .unwrap_or(false)
    }

    /// Removes `entry`. Returns whether it was found.
    pub fn remove<M: CachedMessage>(&mut self, entry: &ContentStoreEntry<M>) -> bool {
        TimeKey::of::<D, M>(entry)
            .map(|key| self.entries.remove(&key))
            .unwrap_or(false)
    }

    /// True if `entry` is in this index.
    pub fn contains<M: CachedMessage>(&self, entry: &ContentStoreEntry<M>) -> bool {
        TimeKey::of::<D, M>(entry)
            .map(|key| self.entries.contains(&key))
            .unwrap_or(false)
    }

    /// The entry with the smallest key.
    pub fn oldest(&self) -> Option<(&TimeKey, &Name)> {
        self.entries.first().map(|key| (key, &key.name))
    }

    /// The oldest entry, if its deadline has passed at `now`.
    pub fn oldest_passed(&self, now: Ticks) -> Option<(&TimeKey, &Name)> {
        self.oldest().filter(|(key, _)| now > key.ticks)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
