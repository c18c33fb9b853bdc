//! Cached message model.
//!
//! The forwarder hands the store reference-counted content objects. The store
//! reads four things from them: the name, a stable identity, and the two
//! optional deadlines (ExpiryTime and RecommendedCacheTime).

use bytes::Bytes;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::name::Name;

/// Forwarder time unit. Monotonic, not wall-clock.
pub type Ticks = u64;

// == Expiry ==
/// A deadline in ticks, or no deadline at all.
///
/// `At` is declared first so that every concrete deadline orders before `Never`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Expiry {
    /// Deadline at the given tick
    At(Ticks),
    /// No deadline
    #[default]
    Never,
}

impl Expiry {
    /// Returns the deadline tick, if any.
    pub fn ticks(self) -> Option<Ticks> {
        match self {
            Expiry::At(ticks) => Some(ticks),
            Expiry::Never => None,
        }
    }

    /// True if a deadline is set.
    pub fn is_set(self) -> bool {
        matches!(self, Expiry::At(_))
    }

    /// True once `now` has strictly passed the deadline.
    ///
    /// Used for eviction and trimming.
    pub fn has_passed(self, now: Ticks) -> bool {
        matches!(self, Expiry::At(ticks) if now > ticks)
    }

    /// True once `now` has reached the deadline.
    ///
    /// Used to refuse content on arrival.
    pub fn is_reached(self, now: Ticks) -> bool {
        matches!(self, Expiry::At(ticks) if now >= ticks)
    }
}

impl From<Option<Ticks>> for Expiry {
    fn from(ticks: Option<Ticks>) -> Self {
        ticks.map_or(Expiry::Never, Expiry::At)
    }
}

// == Message Identity ==
static NEXT_MESSAGE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a message, used to break ties between
/// entries sharing a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(u64);

impl MessageId {
    /// Allocates the next identity.
    pub fn next() -> Self {
        Self(NEXT_MESSAGE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg#{}", self.0)
    }
}

// == Cached Message Trait ==
/// What the store needs from a message it caches.
///
/// Implementations must be immutable once handed to the store: the deadlines
/// are read once at insert time and used as index keys afterwards.
pub trait CachedMessage {
    /// Exact-match name of the content.
    fn name(&self) -> &Name;

    /// Stable identity, unique among live messages.
    fn id(&self) -> MessageId;

    /// Absolute tick after which the content must not be served.
    fn expiry_time(&self) -> Expiry;

    /// Tick after which the content is no longer worth keeping.
    fn recommended_cache_time(&self) -> Expiry;
}

// == Content Object ==
/// A content object as cached by the forwarder.
#[derive(Debug, Clone)]
pub struct ContentObject {
    id: MessageId,
    name: Name,
    payload: Bytes,
    expiry_time: Expiry,
    recommended_cache_time: Expiry,
}

impl ContentObject {
    /// Creates a content object with no deadlines.
    pub fn new(name: impl Into<Name>, payload: impl Into<Bytes>) -> Self {
        Self {
            id: MessageId::next(),
            name: name.into(),
            payload: payload.into(),
            expiry_time: Expiry::Never,
            recommended_cache_time: Expiry::Never,
        }
    }

    /// Sets the ExpiryTime.
    pub fn with_expiry_time(mut self, ticks: Ticks) -> Self {
        self.expiry_time = Expiry::At(ticks);
        self
    }

    /// Sets the RecommendedCacheTime.
    pub fn with_recommended_cache_time(mut self, ticks: Ticks) -> Self {
        self.recommended_cache_time = Expiry::At(ticks);
        self
    }

    /// The object payload.
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }
}

impl CachedMessage for ContentObject {
    fn name(&self) -> &Name {
        &self.name
    }

    fn id(&self) -> MessageId {
        self.id
    }

    fn expiry_time(&self) -> Expiry {
        self.expiry_time
    }

    fn recommended_cache_time(&self) -> Expiry {
        self.recommended_cache_time
    }
}
