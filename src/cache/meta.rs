use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CacheLayer {
    Memory,
    Durable,
    Origin,
}

impl CacheLayer {
    pub fn as_str(self) -> &'static str {
        match self {
            CacheLayer::Memory => "MEMORY",
            CacheLayer::Durable => "DURABLE",
            CacheLayer::Origin => "ORIGIN",
        }
    }
}

impl fmt::Display for CacheLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostics for a single resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CacheMeta {
    pub hit: bool,
    pub layer: CacheLayer,
    pub age_seconds: f64,
    pub duration_ms: u64,
}

impl CacheMeta {
    pub fn hit(layer: CacheLayer, age_seconds: f64, duration_ms: u64) -> Self {
        Self {
            hit: true,
            layer,
            age_seconds,
            duration_ms,
        }
    }

    pub fn origin(duration_ms: u64) -> Self {
        Self {
            hit: false,
            layer: CacheLayer::Origin,
            age_seconds: 0.0,
            duration_ms,
        }
    }

    /// Response headers describing this resolution.
    ///
    /// `X-Cache-Layer` reveals the storage topology, so it is only emitted when
    /// `expose_layer` is set.
    pub fn debug_headers(&self, expose_layer: bool) -> Vec<(&'static str, String)> {
        let mut headers = vec![
            ("X-Response-Time", format!("{}ms", self.duration_ms)),
            ("X-Cache", if self.hit { "HIT" } else { "MISS" }.to_string()),
            ("Age", format!("{}", self.age_seconds.round() as u64)),
        ];
        if expose_layer {
            headers.push(("X-Cache-Layer", self.layer.to_string()));
        }
        headers
    }
}
