//! Fractal pivot detection

use crate::models::indicators::{Candle, PivotKind, PivotPoint};

/// Find fractal pivots using a symmetric window of `range` candles per side.
///
/// A candle is a pivot-high when no neighbour's high exceeds its own, and a
/// pivot-low when no neighbour's low undercuts it. Ties keep the pivot.
/// Highs are returned first (left to right), then lows (left to right).
pub fn detect_pivots(candles: &[Candle], range: usize) -> Vec<PivotPoint> {
    if range == 0 || candles.len() < 2 * range + 1 {
        return Vec::new();
    }

    let mut highs = Vec::new();
    let mut lows = Vec::new();

    for i in range..candles.len() - range {
        let candle = &candles[i];
        let mut is_high = true;
        let mut is_low = true;

        for j in 1..=range {
            let (left, right) = (&candles[i - j], &candles[i + j]);
            if left.high > candle.high || right.high > candle.high {
                is_high = false;
            }
            if left.low < candle.low || right.low < candle.low {
                is_low = false;
            }
            if !is_high && !is_low {
                break;
            }
        }

        let volume = candle.volume.unwrap_or(0.0);
        if is_high {
            highs.push(PivotPoint {
                index: i,
                price: candle.high,
                kind: PivotKind::High,
                volume,
            });
        }
        if is_low {
            lows.push(PivotPoint {
                index: i,
                price: candle.low,
                kind: PivotKind::Low,
                volume,
            });
        }
    }

    highs.extend(lows);
    highs
}
