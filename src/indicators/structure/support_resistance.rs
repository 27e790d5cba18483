//! Support and Resistance levels detection
//!
//! Pivot fractals are clustered by price proximity. Clusters touched at least
//! twice become levels, ranked by distance from the current price.

use serde::{Deserialize, Serialize};

use super::clustering::{ClusteringStrategy, GreedyProximityClustering};
use super::pivots::detect_pivots;
use crate::models::indicators::{Candle, LevelCluster, LevelReport, SupportResistanceLevels};

pub const DEFAULT_PIVOT_RANGE: usize = 5;
pub const DEFAULT_CLUSTER_PCT: f64 = 0.015;
pub const DEFAULT_MIN_TOUCHES: usize = 2;
pub const DEFAULT_MAX_LEVELS: usize = 3;
pub const MIN_CANDLES: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Candles checked on each side of a pivot candidate.
    pub range: usize,
    /// Cluster width as a fraction of the current price.
    pub cluster_pct: f64,
    pub min_touches: usize,
    pub max_levels: usize,
    pub min_candles: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            range: DEFAULT_PIVOT_RANGE,
            cluster_pct: DEFAULT_CLUSTER_PCT,
            min_touches: DEFAULT_MIN_TOUCHES,
            max_levels: DEFAULT_MAX_LEVELS,
            min_candles: MIN_CANDLES,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PivotClusterAnalyzer<S = GreedyProximityClustering> {
    config: AnalyzerConfig,
    strategy: S,
}

impl PivotClusterAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            config,
            strategy: GreedyProximityClustering,
        }
    }
}

impl Default for PivotClusterAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

impl<S: ClusteringStrategy> PivotClusterAnalyzer<S> {
    pub fn with_strategy(config: AnalyzerConfig, strategy: S) -> Self {
        Self { config, strategy }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Ranked clusters on each side of the last close.
    ///
    /// Returns an empty report when the series is too short to confirm pivots.
    pub fn analyze(&self, candles: &[Candle]) -> LevelReport {
        let required = self.config.min_candles.max(2 * self.config.range + 1);
        let Some(last) = candles.last() else {
            return LevelReport::default();
        };
        if candles.len() < required {
            return LevelReport {
                current_price: last.close,
                ..LevelReport::default()
            };
        }

        let current_price = last.close;
        let pivots = detect_pivots(candles, self.config.range);
        let threshold = current_price * self.config.cluster_pct;
        let clusters = self.strategy.cluster(&pivots, threshold);

        let (supports, resistances) = rank_clusters(
            clusters,
            current_price,
            self.config.min_touches,
            self.config.max_levels,
        );

        LevelReport {
            current_price,
            supports,
            resistances,
        }
    }

    pub fn compute_levels(&self, candles: &[Candle]) -> SupportResistanceLevels {
        self.analyze(candles).into_levels()
    }
}

/// Split clusters around `current_price`, nearest first, dropping weak ones.
pub fn rank_clusters(
    clusters: Vec<LevelCluster>,
    current_price: f64,
    min_touches: usize,
    max_levels: usize,
) -> (Vec<LevelCluster>, Vec<LevelCluster>) {
    let (mut supports, mut resistances): (Vec<_>, Vec<_>) = clusters
        .into_iter()
        .filter(|c| c.touch_count >= min_touches)
        .partition(|c| c.average_price < current_price);

    // Clusters sitting exactly on the price (or NaN) belong to neither side.
    resistances.retain(|c| c.average_price > current_price);

    supports.sort_by(|a, b| b.average_price.total_cmp(&a.average_price));
    resistances.sort_by(|a, b| a.average_price.total_cmp(&b.average_price));
    supports.truncate(max_levels);
    resistances.truncate(max_levels);

    (supports, resistances)
}

/// Calculate support/resistance with default parameters (range 5, 1.5% zones)
pub fn calculate_support_resistance(candles: &[Candle]) -> SupportResistanceLevels {
    PivotClusterAnalyzer::new(AnalyzerConfig::default()).compute_levels(candles)
}
