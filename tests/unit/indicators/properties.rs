//! Property tests for the level analyzer

use levelcache::indicators::calculate_support_resistance;
use levelcache::models::indicators::Candle;
use quickcheck_macros::quickcheck;

fn series(bars: &[(u8, u8, u8)]) -> Vec<Candle> {
    bars.iter()
        .enumerate()
        .map(|(i, (close, up, down))| {
            let close = 50.0 + f64::from(*close);
            let high = close + f64::from(*up) / 10.0;
            let low = close - f64::from(*down) / 10.0;
            Candle::new(i as i64 * 60, close, high, low, close)
                .with_volume(f64::from(*up) * 100.0)
        })
        .collect()
}

#[quickcheck]
fn levels_straddle_current_price(bars: Vec<(u8, u8, u8)>) -> bool {
    let candles = series(&bars);
    let levels = calculate_support_resistance(&candles);
    let Some(current) = candles.last().map(|c| c.close) else {
        return levels.is_empty();
    };

    levels.supports.len() <= 3
        && levels.resistances.len() <= 3
        && levels.supports.iter().all(|s| *s < current)
        && levels.resistances.iter().all(|r| *r > current)
        && levels.supports.windows(2).all(|w| w[0] >= w[1])
        && levels.resistances.windows(2).all(|w| w[0] <= w[1])
}

#[quickcheck]
fn compute_is_idempotent(bars: Vec<(u8, u8, u8)>) -> bool {
    let candles = series(&bars);
    calculate_support_resistance(&candles) == calculate_support_resistance(&candles)
}

#[quickcheck]
fn short_series_yield_nothing(bars: Vec<(u8, u8, u8)>) -> bool {
    let candles = series(&bars[..bars.len().min(19)]);
    calculate_support_resistance(&candles).is_empty()
}
