//! Conventional TTL tiers for provider data

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TtlTier {
    /// Price snapshots
    Realtime,
    /// News, historical bars
    Short,
    /// Technicals
    Medium,
    /// Financial metrics
    Long,
    /// Company facts, insider trades
    Weekly,
}

impl TtlTier {
    pub fn as_secs(self) -> u64 {
        match self {
            TtlTier::Realtime => 60,
            TtlTier::Short => 15 * 60,
            TtlTier::Medium => 4 * 60 * 60,
            TtlTier::Long => 24 * 60 * 60,
            TtlTier::Weekly => 7 * 24 * 60 * 60,
        }
    }

    /// Pick a tier from a provider endpoint path.
    pub fn for_endpoint(endpoint: &str) -> Self {
        let endpoint = endpoint.to_ascii_lowercase();
        if endpoint.contains("insider") || endpoint.contains("facts") {
            TtlTier::Weekly
        } else if endpoint.contains("price") {
            TtlTier::Realtime
        } else if endpoint.contains("news") {
            TtlTier::Short
        } else {
            TtlTier::Long
        }
    }
}
