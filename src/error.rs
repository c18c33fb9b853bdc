//! Error types for the content store
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

use crate::message::Ticks;
use crate::name::Name;

// == Store Error Enum ==
/// Unified error type for the content store.
///
/// Lookups that miss are not errors; they return `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store limit is zero, nothing can be cached
    #[error("Content store is disabled (capacity 0)")]
    ZeroCapacity,

    /// The object reached its ExpiryTime before it could be stored
    #[error("Content {name} expired at tick {expiry} (now {now})")]
    Expired { name: Name, expiry: Ticks, now: Ticks },

    /// The object reached its RecommendedCacheTime before it could be stored
    #[error("Content {name} passed its recommended cache time {recommended} (now {now})")]
    PastRecommendedCacheTime {
        name: Name,
        recommended: Ticks,
        now: Ticks,
    },

    /// A configuration value could not be parsed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// == Result Type Alias ==
/// Convenience Result type for the content store.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_content() {
        let err = StoreError::Expired {
            name: Name::from_uri("/a/b"),
            expiry: 100,
            now: 150,
        };
        assert_eq!(err.to_string(), "Content /a/b expired at tick 100 (now 150)");

        let err = StoreError::PastRecommendedCacheTime {
            name: Name::from_uri("/c"),
            recommended: 10,
            now: 11,
        };
        assert!(err.to_string().contains("/c"));
        assert!(err.to_string().contains("recommended cache time 10"));
    }
}
