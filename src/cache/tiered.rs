//! Three-layer cache: process memory, durable store, origin fetch

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::classify::{Cacheability, Fetched, PatternClassifier, TransientClassifier};
use super::clock::{Clock, SystemClock};
use super::entry::{evict_if_expired, CacheEntry};
use super::error::CacheError;
use super::meta::{CacheLayer, CacheMeta};
use super::store::DurableStore;
use crate::config::CacheConfig;
use crate::metrics::Metrics;

/// A payload together with how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub payload: T,
    pub meta: CacheMeta,
}

/// Memory → durable → origin cache.
///
/// Concurrent misses on the same key are not collapsed: each caller runs its
/// own fetcher and the last write wins.
pub struct TieredCache {
    memory: RwLock<HashMap<String, CacheEntry>>,
    durable: Option<Arc<dyn DurableStore>>,
    classifier: Arc<dyn TransientClassifier>,
    clock: Arc<dyn Clock>,
    namespace: String,
    metrics: Option<Arc<Metrics>>,
}

impl TieredCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            memory: RwLock::new(HashMap::new()),
            durable: None,
            classifier: Arc::new(PatternClassifier::new(config.transient_patterns.clone())),
            clock: Arc::new(SystemClock),
            namespace: config.namespace.clone(),
            metrics: None,
        }
    }

    pub fn with_durable(mut self, store: Arc<dyn DurableStore>) -> Self {
        self.durable = Some(store);
        self
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn TransientClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Key as stored in both layers.
    pub fn storage_key(&self, key: &str) -> String {
        format!("{}{}", self.namespace, key)
    }

    /// Resolve `key`, calling `fetcher` only when neither cache layer holds a
    /// valid entry.
    ///
    /// Fetcher errors come back as `CacheError::Origin` untouched. Durable
    /// store failures are logged and never returned.
    pub async fn resolve<T, F, Fut, E>(
        &self,
        key: impl AsRef<str>,
        ttl_seconds: u64,
        fetcher: F,
    ) -> Result<Resolved<T>, CacheError<E>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Fetched<T>, E>>,
    {
        let key = key.as_ref();
        let start = Instant::now();
        let now = self.clock.now_ms();
        let storage_key = self.storage_key(key);

        if let Some(resolved) = self.read_memory(key, &storage_key, now, start).await {
            return Ok(resolved);
        }

        if let Some(resolved) = self.read_durable(key, &storage_key, now, start).await {
            return Ok(resolved);
        }

        info!(key = %key, "Cache miss, fetching from origin");
        let fetched = match fetcher().await {
            Ok(fetched) => fetched,
            Err(e) => {
                warn!(key = %key, "Origin fetch failed");
                return Err(CacheError::Origin(e));
            }
        };

        let (payload, transient) = match fetched {
            Fetched::Ok(payload) => (payload, None),
            Fetched::Transient { payload, reason } => (payload, Some(reason)),
        };
        let value = serde_json::to_value(&payload).map_err(CacheError::Payload)?;
        let cacheability = match transient {
            Some(reason) => Cacheability::Transient(reason),
            None => self.classifier.classify(&value),
        };
        self.record(CacheLayer::Origin, "fetched");

        match cacheability {
            Cacheability::Cacheable => {
                let entry = CacheEntry::new(value, self.clock.now_ms(), ttl_seconds);
                self.write_through(key, &storage_key, entry).await;
            }
            Cacheability::Empty => {
                debug!(key = %key, "Origin returned no data, not caching");
                self.skipped();
            }
            Cacheability::Transient(reason) => {
                warn!(key = %key, reason = %reason, "Transient origin error, not caching");
                self.skipped();
            }
        }

        Ok(Resolved {
            payload,
            meta: CacheMeta::origin(elapsed_ms(start)),
        })
    }

    /// Drop `key` from both layers.
    pub async fn invalidate(&self, key: impl AsRef<str>) {
        let storage_key = self.storage_key(key.as_ref());
        self.memory.write().await.remove(&storage_key);
        if let Some(store) = &self.durable {
            if let Err(e) = store.remove(&storage_key).await {
                warn!(key = %key.as_ref(), error = %e, "Durable cache remove failed");
                self.store_error("remove");
            }
        }
    }

    pub async fn clear_memory(&self) {
        self.memory.write().await.clear();
    }

    pub async fn memory_len(&self) -> usize {
        self.memory.read().await.len()
    }

    async fn read_memory<T: DeserializeOwned>(
        &self,
        key: &str,
        storage_key: &str,
        now: i64,
        start: Instant,
    ) -> Option<Resolved<T>> {
        let entry = self.memory.read().await.get(storage_key).cloned()?;

        if !entry.is_valid_at(now) {
            evict_if_expired(&mut *self.memory.write().await, storage_key, now);
            debug!(key = %key, "Memory cache entry expired");
            self.record(CacheLayer::Memory, "expired");
            return None;
        }

        match serde_json::from_value::<T>(entry.payload.clone()) {
            Ok(payload) => {
                debug!(key = %key, "Memory cache hit");
                self.record(CacheLayer::Memory, "hit");
                Some(Resolved {
                    payload,
                    meta: CacheMeta::hit(
                        CacheLayer::Memory,
                        entry.age_seconds(now),
                        elapsed_ms(start),
                    ),
                })
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Memory cache entry has unexpected shape");
                self.record(CacheLayer::Memory, "miss");
                None
            }
        }
    }

    async fn read_durable<T: DeserializeOwned>(
        &self,
        key: &str,
        storage_key: &str,
        now: i64,
        start: Instant,
    ) -> Option<Resolved<T>> {
        let store = self.durable.as_ref()?;

        let entry = match store.get(storage_key).await {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                self.record(CacheLayer::Durable, "miss");
                return None;
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Durable cache read failed");
                self.store_error("read");
                return None;
            }
        };

        if !entry.is_valid_at(now) {
            debug!(key = %key, "Durable cache entry expired");
            self.record(CacheLayer::Durable, "expired");
            if let Err(e) = store.remove(storage_key).await {
                warn!(key = %key, error = %e, "Durable cache remove failed");
                self.store_error("remove");
            }
            return None;
        }

        let payload = match serde_json::from_value::<T>(entry.payload.clone()) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(key = %key, error = %e, "Durable cache entry has unexpected shape");
                self.record(CacheLayer::Durable, "miss");
                return None;
            }
        };

        debug!(key = %key, "Durable cache hit, promoting to memory");
        self.record(CacheLayer::Durable, "hit");
        let age_seconds = entry.age_seconds(now);
        self.memory
            .write()
            .await
            .insert(storage_key.to_string(), entry);

        Some(Resolved {
            payload,
            meta: CacheMeta::hit(CacheLayer::Durable, age_seconds, elapsed_ms(start)),
        })
    }

    async fn write_through(&self, key: &str, storage_key: &str, entry: CacheEntry) {
        if let Some(store) = &self.durable {
            if let Err(e) = store.set(storage_key, &entry).await {
                warn!(key = %key, error = %e, "Durable cache write failed");
                self.store_error("write");
            }
        }
        self.memory
            .write()
            .await
            .insert(storage_key.to_string(), entry);
    }

    fn record(&self, layer: CacheLayer, result: &str) {
        if let Some(metrics) = &self.metrics {
            let layer = match layer {
                CacheLayer::Memory => "memory",
                CacheLayer::Durable => "durable",
                CacheLayer::Origin => "origin",
            };
            metrics.record_lookup(layer, result);
        }
    }

    fn skipped(&self) {
        if let Some(metrics) = &self.metrics {
            metrics.cache_transient_skips_total.inc();
        }
    }

    fn store_error(&self, op: &str) {
        if let Some(metrics) = &self.metrics {
            metrics.record_store_error(op);
        }
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
