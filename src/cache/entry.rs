//! Content Store Entry Module
//!
//! Wraps one cached message together with its recency handle and deadlines.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::cache::lru::{LruHandle, LruList};
use crate::message::{CachedMessage, Expiry, Ticks};
use crate::name::Name;

// == Content Store Entry ==
/// A cached message plus its membership in the store's recency list.
///
/// The deadlines are copied out of the message at creation so the time
/// indices never have to call back into the message.
#[derive(Debug)]
pub struct ContentStoreEntry<M> {
    message: Arc<M>,
    lru_handle: Option<LruHandle>,
    expiry_time: Expiry,
    recommended_cache_time: Expiry,
}

impl<M: CachedMessage> ContentStoreEntry<M> {
    // == Constructor ==
    /// Creates an entry for `message`.
    ///
    /// If a list is given, the message name is linked at its head and the
    /// entry keeps the handle.
    pub fn new(message: Arc<M>, lru: Option<&mut LruList<Name>>) -> Self {
        let lru_handle = lru.map(|list| list.push_head(message.name().clone()));

        Self {
            expiry_time: message.expiry_time(),
            recommended_cache_time: message.recommended_cache_time(),
            message,
            lru_handle,
        }
    }

    // == Message ==
    /// The wrapped message.
    pub fn message(&self) -> &Arc<M> {
        &self.message
    }

    /// Takes a new shared reference to the wrapped message.
    pub fn acquire_message(&self) -> Arc<M> {
        Arc::clone(&self.message)
    }

    /// Gives up the entry and returns its message reference.
    pub fn into_message(self) -> Arc<M> {
        self.message
    }

    pub fn name(&self) -> &Name {
        self.message.name()
    }

    // == Deadlines ==
    pub fn expiry_time(&self) -> Expiry {
        self.expiry_time
    }

    pub fn has_expiry_time(&self) -> bool {
        self.expiry_time.is_set()
    }

    /// ExpiryTime in ticks, None if the message never expires.
    pub fn expiry_time_ticks(&self) -> Option<Ticks> {
        self.expiry_time.ticks()
    }

    pub fn recommended_cache_time(&self) -> Expiry {
        self.recommended_cache_time
    }

    pub fn has_recommended_cache_time(&self) -> bool {
        self.recommended_cache_time.is_set()
    }

    /// RecommendedCacheTime in ticks, None if the message did not carry one.
    pub fn recommended_cache_time_ticks(&self) -> Option<Ticks> {
        self.recommended_cache_time.ticks()
    }

    /// True once the ExpiryTime has passed.
    pub fn is_expired(&self, now: Ticks) -> bool {
        self.expiry_time.has_passed(now)
    }

    /// True once the RecommendedCacheTime has passed.
    pub fn is_past_recommended_cache_time(&self, now: Ticks) -> bool {
        self.recommended_cache_time.has_passed(now)
    }

    // == Recency ==
    pub fn lru_handle(&self) -> Option<LruHandle> {
        self.lru_handle
    }

    pub fn is_lru_attached(&self) -> bool {
        self.lru_handle.is_some()
    }

    /// Moves this entry to the head of `lru`.
    ///
    /// # Panics
    /// Panics if the entry is not attached to a recency list, or if its handle
    /// does not belong to `lru`. Both are caller bugs.
    pub fn move_to_head(&self, lru: &mut LruList<Name>) {
        let handle = self
            .lru_handle
            .unwrap_or_else(|| panic!("entry {} is not attached to an LRU list", self.name()));
        assert!(
            lru.move_to_head(handle),
            "entry {} holds a stale LRU handle",
            self.name()
        );
    }

    /// Unlinks the entry from `lru`. Returns false if it was not attached.
    pub fn detach(&mut self, lru: &mut LruList<Name>) -> bool {
        match self.lru_handle.take() {
            Some(handle) => lru.remove(handle).is_some(),
            None => false,
        }
    }

    // == Comparators ==
    /// Orders by ExpiryTime ascending, then by message identity.
    ///
    /// Returns `Equal` only for entries wrapping the same message.
    pub fn compare_expiry_time(a: &Self, b: &Self) -> Ordering {
        a.expiry_time
            .cmp(&b.expiry_time)
            .then_with(|| a.message.id().cmp(&b.message.id()))
    }

    /// Orders by RecommendedCacheTime ascending, then by message identity.
    pub fn compare_recommended_cache_time(a: &Self, b: &Self) -> Ordering {
        a.recommended_cache_time
            .cmp(&b.recommended_cache_time)
            .then_with(|| a.message.id().cmp(&b.message.id()))
    }
}
