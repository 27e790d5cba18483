//! Durable layer adapter

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use super::entry::CacheEntry;
use super::error::StoreError;

/// Key-value document store that survives process restarts.
///
/// Keys arrive already namespaced. Implementations do not need to enforce
/// expiry; the cache checks `expires_at_ms` on every read.
#[async_trait]
pub trait DurableStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, StoreError>;

    async fn set(&self, key: &str, entry: &CacheEntry) -> Result<(), StoreError>;

    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Process-local durable store. Useful when no external store is configured
/// and in tests, where it can be switched offline to simulate an outage.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
    offline: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("store is offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DurableStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, StoreError> {
        self.check_online()?;
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, entry: &CacheEntry) -> Result<(), StoreError> {
        self.check_online()?;
        self.entries
            .write()
            .await
            .insert(key.to_string(), entry.clone());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.check_online()?;
        self.entries.write().await.remove(key);
        Ok(())
    }
}
