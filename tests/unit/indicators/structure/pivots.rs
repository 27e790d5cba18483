//! Unit tests for fractal pivot detection

use crate::fixtures::{double_touch_series, trending_series};
use levelcache::indicators::detect_pivots;
use levelcache::models::indicators::{Candle, PivotKind};

#[test]
fn test_detects_double_tops_and_bottoms() {
    let pivots = detect_pivots(&double_touch_series(), 5);

    let highs: Vec<(usize, f64)> = pivots
        .iter()
        .filter(|p| p.kind == PivotKind::High)
        .map(|p| (p.index, p.price))
        .collect();
    let lows: Vec<(usize, f64)> = pivots
        .iter()
        .filter(|p| p.kind == PivotKind::Low)
        .map(|p| (p.index, p.price))
        .collect();

    assert_eq!(highs, vec![(9, 104.0), (16, 104.0)]);
    assert_eq!(lows, vec![(6, 96.0), (13, 96.0)]);
}

#[test]
fn test_highs_are_listed_before_lows() {
    let pivots = detect_pivots(&double_touch_series(), 5);
    let kinds: Vec<PivotKind> = pivots.iter().map(|p| p.kind).collect();
    assert_eq!(
        kinds,
        vec![PivotKind::High, PivotKind::High, PivotKind::Low, PivotKind::Low]
    );
}

#[test]
fn test_ties_keep_pivot_and_candle_can_be_both() {
    let candles: Vec<Candle> = (0..11)
        .map(|i| Candle::new(i, 100.0, 101.0, 99.0, 100.0))
        .collect();

    let pivots = detect_pivots(&candles, 5);

    assert_eq!(pivots.len(), 2);
    assert_eq!(pivots[0].index, 5);
    assert_eq!(pivots[0].kind, PivotKind::High);
    assert_eq!(pivots[1].index, 5);
    assert_eq!(pivots[1].kind, PivotKind::Low);
}

#[test]
fn test_edges_are_never_pivots() {
    let candles = trending_series(30);
    let pivots = detect_pivots(&candles, 5);
    // A monotonic series has its extremes at the trimmed edges.
    assert!(pivots.is_empty());
}

#[test]
fn test_pivot_volume_defaults_to_zero() {
    let candles: Vec<Candle> = (0..11)
        .map(|i| Candle::new(i, 100.0, 101.0, 99.0, 100.0))
        .collect();
    assert!(detect_pivots(&candles, 5).iter().all(|p| p.volume == 0.0));

    let pivots = detect_pivots(&double_touch_series(), 5);
    assert_eq!(pivots[0].volume, 1_009.0);
}

#[test]
fn test_short_series_or_zero_range() {
    let candles = trending_series(10);
    assert!(detect_pivots(&candles, 5).is_empty());
    assert!(detect_pivots(&double_touch_series(), 0).is_empty());
}
