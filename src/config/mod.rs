//! Environment-driven configuration

use serde::{Deserialize, Serialize};
use std::env;

use crate::cache::DEFAULT_TRANSIENT_PATTERNS;

pub const DEFAULT_CACHE_NAMESPACE: &str = "api_cache_";

/// Deployment environment (`production`, `sandbox`, ...). Defaults to `sandbox`.
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

/// `LOG_FORMAT` override for the log output (`json` or `pretty`).
pub fn get_log_format() -> Option<String> {
    env::var("LOG_FORMAT").ok().filter(|f| !f.trim().is_empty())
}

pub fn get_redis_url() -> String {
    env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379/".to_string())
}

/// Base URL of the candle provider.
pub fn get_market_data_url() -> String {
    env::var("MARKET_DATA_URL").unwrap_or_else(|_| "http://127.0.0.1:9000".to_string())
}

pub fn get_port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Prefix applied to every key in both layers.
    pub namespace: String,
    /// Lowercase phrases marking an origin `error` as transient.
    pub transient_patterns: Vec<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_CACHE_NAMESPACE.to_string(),
            transient_patterns: DEFAULT_TRANSIENT_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

impl CacheConfig {
    /// Read `CACHE_NAMESPACE` and `CACHE_TRANSIENT_PATTERNS` (comma separated).
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(namespace) = env::var("CACHE_NAMESPACE") {
            config.namespace = namespace;
        }
        if let Ok(patterns) = env::var("CACHE_TRANSIENT_PATTERNS") {
            config.transient_patterns = parse_patterns(&patterns);
        }
        config
    }
}

pub fn parse_patterns(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|p| p.trim().to_lowercase())
        .filter(|p| !p.is_empty())
        .collect()
}
