use std::fmt;

/// Opaque cache key. Only exact string equality matters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Build `PROVIDER_ENDPOINT_PARAM..` from sanitized parts.
    ///
    /// `compose("fd", "/prices/snapshot", ["aapl"])` gives `FD_PRICES_SNAPSHOT_AAPL`.
    pub fn compose<I, P>(provider: &str, endpoint: &str, params: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let endpoint = endpoint.trim_start_matches('/');
        let mut parts = vec![sanitize_part(provider), sanitize_part(endpoint)];
        parts.extend(params.into_iter().map(|p| sanitize_part(p.as_ref())));
        Self(
            parts
                .into_iter()
                .filter(|p| !p.is_empty())
                .collect::<Vec<_>>()
                .join("_"),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CacheKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for CacheKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// Replace anything outside `[A-Za-z0-9_]` with `_` and uppercase.
pub fn sanitize_part(part: &str) -> String {
    part.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}
