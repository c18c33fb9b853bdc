//! Configuration Module
//!
//! Loads content store settings from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::EvictionPolicy;
use crate::error::{Result, StoreError};

/// Content store configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of cached objects
    pub capacity: usize,
    /// Period of the background trim task in milliseconds
    pub trim_interval_ms: u64,
    /// Length of one forwarder tick in milliseconds
    pub tick_ms: u64,
    /// Prefer expired entries as eviction victims
    pub evict_expired: bool,
    /// Prefer entries past their recommended cache time as eviction victims
    pub evict_past_rct: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// Missing or malformed values fall back to defaults.
    ///
    /// # Environment Variables
    /// - `CS_CAPACITY` - Maximum cached objects (default: 100000)
    /// - `CS_TRIM_INTERVAL_MS` - Trim period in milliseconds (default: 1000)
    /// - `CS_TICK_MS` - Milliseconds per tick (default: 1)
    /// - `CS_EVICT_EXPIRED` - Evict expired entries first (default: true)
    /// - `CS_EVICT_PAST_RCT` - Evict entries past RCT before LRU (default: true)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            capacity: lenient("CS_CAPACITY", defaults.capacity),
            trim_interval_ms: lenient("CS_TRIM_INTERVAL_MS", defaults.trim_interval_ms),
            tick_ms: lenient("CS_TICK_MS", defaults.tick_ms),
            evict_expired: lenient("CS_EVICT_EXPIRED", defaults.evict_expired),
            evict_past_rct: lenient("CS_EVICT_PAST_RCT", defaults.evict_past_rct),
        }
    }

    /// Like [`Config::from_env`], but a present and malformed value is an error.
    pub fn try_from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            capacity: strict("CS_CAPACITY", defaults.capacity)?,
            trim_interval_ms: strict("CS_TRIM_INTERVAL_MS", defaults.trim_interval_ms)?,
            tick_ms: strict("CS_TICK_MS", defaults.tick_ms)?,
            evict_expired: strict("CS_EVICT_EXPIRED", defaults.evict_expired)?,
            evict_past_rct: strict("CS_EVICT_PAST_RCT", defaults.evict_past_rct)?,
        })
    }

    /// Eviction policy described by this configuration.
    pub fn eviction_policy(&self) -> EvictionPolicy {
        EvictionPolicy {
            evict_expired: self.evict_expired,
            evict_past_recommended_cache_time: self.evict_past_rct,
        }
    }

    pub fn trim_interval(&self) -> Duration {
        Duration::from_millis(self.trim_interval_ms)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 100_000,
            trim_interval_ms: 1000,
            tick_ms: 1,
            evict_expired: true,
            evict_past_rct: true,
        }
    }
}

fn lenient<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn strict<T: FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| StoreError::InvalidConfig(format!("{}={:?} is not a valid value", key, raw))),
        Err(_) => Ok(default),
    }
}
