use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A cached payload with millisecond timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub payload: Value,
    pub created_at_ms: i64,
    pub expires_at_ms: i64,
}

impl CacheEntry {
    pub fn new(payload: Value, now_ms: i64, ttl_seconds: u64) -> Self {
        let ttl_ms = i64::try_from(ttl_seconds.saturating_mul(1000)).unwrap_or(i64::MAX);
        Self {
            payload,
            created_at_ms: now_ms,
            expires_at_ms: now_ms.saturating_add(ttl_ms),
        }
    }

    pub fn is_valid_at(&self, now_ms: i64) -> bool {
        now_ms < self.expires_at_ms
    }

    pub fn age_seconds(&self, now_ms: i64) -> f64 {
        (now_ms - self.created_at_ms).max(0) as f64 / 1000.0
    }

    /// Milliseconds left before expiry, zero once expired.
    pub fn remaining_ms(&self, now_ms: i64) -> u64 {
        u64::try_from(self.expires_at_ms - now_ms).unwrap_or(0)
    }
}

/// Remove `key` only if the entry stored under it is expired at `now_ms`.
/// An entry replaced since the caller last looked is left alone.
pub fn evict_if_expired(
    entries: &mut HashMap<String, CacheEntry>,
    key: &str,
    now_ms: i64,
) -> bool {
    if entries.get(key).is_some_and(|e| !e.is_valid_at(now_ms)) {
        entries.remove(key);
        return true;
    }
    false
}
