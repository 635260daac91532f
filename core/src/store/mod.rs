//! # STORE BOUNDARY
//!
//! Key-value backend consumed by the scoring functions. Backends own their TTL
//! and locking; the dispatcher only sees this trait.

use crate::errors::ScoringError;
use log::warn;
use std::time::Duration;

pub mod memory;

pub use memory::MemoryStore;

pub trait Store: Send + Sync {
    /// Value under `key`; `Ok(None)` when absent or expired.
    fn get(&self, key: &str) -> Result<Option<String>, ScoringError>;

    /// Store `value` for `ttl`. A zero `ttl` keeps the entry until overwritten.
    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), ScoringError>;

    /// Cache-tier read: backend failures are logged and read as a miss.
    fn cache_get(&self, key: &str) -> Option<String> {
        match self.get(key) {
            Ok(value) => value,
            Err(err) => {
                warn!("cache read for {} failed: {}", key, err);
                None
            }
        }
    }

    /// Cache-tier write: backend failures are logged and dropped.
    fn cache_set(&self, key: &str, value: &str, ttl: Duration) {
        if let Err(err) = self.set(key, value, ttl) {
            warn!("cache write for {} failed: {}", key, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::codes;

    struct BrokenStore;

    impl Store for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, ScoringError> {
            Err(ScoringError::store(codes::STORE_UNAVAILABLE, "connection refused"))
        }

        fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), ScoringError> {
            Err(ScoringError::store(codes::STORE_UNAVAILABLE, "connection refused"))
        }
    }

    #[test]
    fn test_cache_tier_swallows_backend_errors() {
        let store = BrokenStore;
        assert_eq!(store.cache_get("uid:1"), None);
        store.cache_set("uid:1", "3.0", Duration::from_secs(60));
        assert!(store.get("uid:1").is_err());
    }
}
