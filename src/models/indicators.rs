use serde::{Deserialize, Serialize};

/// One OHLCV bar. `time` is Unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl Candle {
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume: None,
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PivotKind {
    High,
    Low,
}

/// A candle's high or low flagged as a local extremum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PivotPoint {
    pub index: usize,
    pub price: f64,
    pub kind: PivotKind,
    pub volume: f64,
}

/// A zone of nearby pivot prices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelCluster {
    pub average_price: f64,
    pub touch_count: usize,
    pub max_volume: f64,
    #[serde(skip)]
    price_sum: f64,
}

impl LevelCluster {
    pub fn from_pivot(pivot: &PivotPoint) -> Self {
        Self {
            average_price: pivot.price,
            touch_count: 1,
            max_volume: pivot.volume,
            price_sum: pivot.price,
        }
    }

    /// Fold another pivot into the running mean.
    pub fn absorb(&mut self, pivot: &PivotPoint) {
        self.price_sum += pivot.price;
        self.touch_count += 1;
        self.average_price = self.price_sum / self.touch_count as f64;
        if pivot.volume > self.max_volume {
            self.max_volume = pivot.volume;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupportResistanceLevels {
    pub supports: Vec<f64>,
    pub resistances: Vec<f64>,
}

impl SupportResistanceLevels {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.supports.is_empty() && self.resistances.is_empty()
    }
}

/// Ranked clusters on each side of the current price, before rounding.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LevelReport {
    pub current_price: f64,
    pub supports: Vec<LevelCluster>,
    pub resistances: Vec<LevelCluster>,
}

impl LevelReport {
    /// Round each level to cents. A level that rounds onto the current price
    /// is dropped so supports stay strictly below and resistances above.
    pub fn into_levels(self) -> SupportResistanceLevels {
        let current = self.current_price;
        SupportResistanceLevels {
            supports: self
                .supports
                .iter()
                .map(|c| round_price(c.average_price))
                .filter(|p| *p < current)
                .collect(),
            resistances: self
                .resistances
                .iter()
                .map(|c| round_price(c.average_price))
                .filter(|p| *p > current)
                .collect(),
        }
    }
}

/// Round to two decimal places on the exact binary value, so `100.005`
/// (stored as `100.00499..`) becomes `100.0`. Exact half cents round up.
pub fn round_price(price: f64) -> f64 {
    let eighths = price * 8.0;
    if eighths.fract() == 0.0 && eighths.rem_euclid(2.0) == 1.0 {
        return (price * 100.0 + 0.5).floor() / 100.0;
    }
    format!("{:.2}", price).parse().unwrap_or(price)
}
