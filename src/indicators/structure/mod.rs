pub mod clustering;
pub mod pivots;
pub mod support_resistance;

pub use clustering::{ClusteringStrategy, GreedyProximityClustering};
pub use pivots::detect_pivots;
pub use support_resistance::{
    calculate_support_resistance, rank_clusters, AnalyzerConfig, PivotClusterAnalyzer,
    MIN_CANDLES,
};
