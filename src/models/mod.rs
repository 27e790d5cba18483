//! Shared data models spanning the analysis and cache layers.

pub mod indicators;

pub use indicators::{
    Candle, LevelCluster, LevelReport, PivotKind, PivotPoint, SupportResistanceLevels,
};
