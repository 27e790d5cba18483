//! Tiered cache for origin data
//!
//! Lookups go memory → durable store → origin fetcher. Hits short-circuit,
//! durable hits are promoted into memory, and transient origin failures are
//! handed back without being cached.

pub mod classify;
pub mod clock;
pub mod entry;
pub mod error;
pub mod key;
pub mod meta;
pub mod redis_store;
pub mod store;
pub mod tiered;
pub mod ttl;

pub use classify::{
    Cacheability, Fetched, PatternClassifier, TransientClassifier, DEFAULT_TRANSIENT_PATTERNS,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{evict_if_expired, CacheEntry};
pub use error::{CacheError, StoreError};
pub use key::{sanitize_part, CacheKey};
pub use meta::{CacheLayer, CacheMeta};
pub use redis_store::RedisStore;
pub use store::{DurableStore, InMemoryStore};
pub use tiered::{Resolved, TieredCache};
pub use ttl::TtlTier;
