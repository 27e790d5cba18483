//! Redis-backed durable layer

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::time::Duration;
use tracing::{info, warn};

use super::entry::CacheEntry;
use super::error::StoreError;
use super::store::DurableStore;

/// Stores each entry as a JSON document. Redis `PX` expiry only reclaims
/// space; validity is still decided by `expires_at_ms`.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connect with exponential backoff (3 attempts).
    pub async fn connect(redis_url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(redis_url)?;

        let conn = (|| {
            let client = client.clone();
            async move { ConnectionManager::new(client).await }
        })
        .retry(
            ExponentialBuilder::default()
                .with_min_delay(Duration::from_millis(200))
                .with_max_times(3),
        )
        .notify(|err: &redis::RedisError, delay: Duration| {
            warn!(error = %err, delay_ms = delay.as_millis() as u64, "Redis connect failed, retrying");
        })
        .await?;

        info!("Redis durable cache connected");
        Ok(Self { conn })
    }

    pub fn with_connection(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl DurableStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, StoreError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(key).await?;
        match raw {
            Some(doc) => Ok(Some(serde_json::from_str(&doc)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, entry: &CacheEntry) -> Result<(), StoreError> {
        let doc = serde_json::to_string(entry)?;
        let ttl_ms = (entry.expires_at_ms - entry.created_at_ms).max(1);
        let mut conn = self.conn.clone();
        redis::cmd("SET")
            .arg(key)
            .arg(doc)
            .arg("PX")
            .arg(ttl_ms)
            .query_async::<()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: i64 = conn.del(key).await?;
        Ok(())
    }
}
