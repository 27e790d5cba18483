//! Unit tests for greedy proximity clustering

use levelcache::indicators::{ClusteringStrategy, GreedyProximityClustering};
use levelcache::models::indicators::{PivotKind, PivotPoint};

fn pivot(price: f64, volume: f64) -> PivotPoint {
    PivotPoint {
        index: 0,
        price,
        kind: PivotKind::Low,
        volume,
    }
}

fn prices(pivots: &[f64]) -> Vec<PivotPoint> {
    pivots.iter().map(|p| pivot(*p, 0.0)).collect()
}

#[test]
fn test_nearby_prices_share_a_cluster() {
    let clusters = GreedyProximityClustering.cluster(&prices(&[100.0, 100.5, 110.0]), 1.5);

    assert_eq!(clusters.len(), 2);
    assert_eq!(clusters[0].touch_count, 2);
    assert!((clusters[0].average_price - 100.25).abs() < 1e-9);
    assert_eq!(clusters[1].touch_count, 1);
    assert_eq!(clusters[1].average_price, 110.0);
}

#[test]
fn test_threshold_is_exclusive() {
    let clusters = GreedyProximityClustering.cluster(&prices(&[100.0, 101.5]), 1.5);
    assert_eq!(clusters.len(), 2);
}

#[test]
fn test_joins_first_matching_cluster() {
    // 101.0 is within range of both clusters; the first one wins.
    let clusters = GreedyProximityClustering.cluster(&prices(&[100.0, 102.0, 101.0]), 1.5);

    assert_eq!(clusters.len(), 2);
    assert_eq!(clusters[0].touch_count, 2);
    assert_eq!(clusters[1].touch_count, 1);
}

#[test]
fn test_result_depends_on_discovery_order() {
    let forward = GreedyProximityClustering.cluster(&prices(&[100.0, 101.4, 102.8]), 1.5);
    let backward = GreedyProximityClustering.cluster(&prices(&[102.8, 101.4, 100.0]), 1.5);

    assert!((forward[0].average_price - 100.7).abs() < 1e-9);
    assert!((backward[0].average_price - 102.1).abs() < 1e-9);
    assert_ne!(forward, backward);
}

#[test]
fn test_tracks_max_volume() {
    let pivots = vec![pivot(50.0, 300.0), pivot(50.2, 900.0), pivot(50.1, 100.0)];
    let clusters = GreedyProximityClustering.cluster(&pivots, 1.0);

    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].touch_count, 3);
    assert_eq!(clusters[0].max_volume, 900.0);
}

#[test]
fn test_empty_input() {
    assert!(GreedyProximityClustering.cluster(&[], 1.0).is_empty());
}
