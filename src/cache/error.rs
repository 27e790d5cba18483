use thiserror::Error;

/// Durable store failure. Never surfaces past the cache.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("durable store unavailable: {0}")]
    Unavailable(String),
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("malformed cache document: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors reaching the caller of `TieredCache::resolve`.
#[derive(Debug, Error)]
pub enum CacheError<E> {
    /// The fetcher failed. Passed through unchanged.
    #[error("origin fetch failed: {0}")]
    Origin(E),
    #[error("payload could not be serialized: {0}")]
    Payload(#[source] serde_json::Error),
}

impl<E> CacheError<E> {
    pub fn into_origin(self) -> Option<E> {
        match self {
            CacheError::Origin(e) => Some(e),
            CacheError::Payload(_) => None,
        }
    }
}
