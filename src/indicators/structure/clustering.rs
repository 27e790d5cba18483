//! Pivot clustering strategies

use crate::models::indicators::{LevelCluster, PivotPoint};

/// Groups pivot prices into level zones.
pub trait ClusteringStrategy {
    fn cluster(&self, pivots: &[PivotPoint], threshold: f64) -> Vec<LevelCluster>;
}

/// Linear scan: each pivot joins the first cluster whose running average is
/// within `threshold`, otherwise it opens a new one.
///
/// Order-dependent. Feeding the same pivots in another order can produce
/// different zones.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyProximityClustering;

impl ClusteringStrategy for GreedyProximityClustering {
    fn cluster(&self, pivots: &[PivotPoint], threshold: f64) -> Vec<LevelCluster> {
        let mut clusters: Vec<LevelCluster> = Vec::new();

        for pivot in pivots {
            match clusters
                .iter_mut()
                .find(|c| (c.average_price - pivot.price).abs() < threshold)
            {
                Some(cluster) => cluster.absorb(pivot),
                None => clusters.push(LevelCluster::from_pivot(pivot)),
            }
        }

        clusters
    }
}
