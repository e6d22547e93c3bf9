use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single OHLCV price bar.
///
/// A bar series is always **chronologically ascending**: index 0 is the
/// oldest bar and `last()` is the most recent. Every windowed computation
/// in the engine (RSI, ATR, volume baselines, pattern lookback) relies on
/// this ordering; callers converting provider data that arrives
/// newest-first must reverse it before handing it to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bar {
    /// Bar open time.
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Traded volume, always >= 0.
    pub volume: f64,
}

impl Bar {
    /// Typical price (high + low + close) / 3.
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Whether the bar closed above its open.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }
}

/// Bar timeframe requested from the market-data collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    OneMinute,
    FiveMinute,
    FifteenMinute,
    OneHour,
    #[default]
    OneDay,
}

impl Timeframe {
    /// Provider-facing label for this timeframe.
    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::OneMinute => "1Min",
            Timeframe::FiveMinute => "5Min",
            Timeframe::FifteenMinute => "15Min",
            Timeframe::OneHour => "1Hour",
            Timeframe::OneDay => "1Day",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_typical_price() {
        let bar = Bar {
            timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            open: 100.0,
            high: 105.0,
            low: 95.0,
            close: 100.0,
            volume: 1000.0,
        };
        assert!((bar.typical_price() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_is_bullish() {
        let mut bar = Bar {
            timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            open: 100.0,
            high: 105.0,
            low: 95.0,
            close: 101.0,
            volume: 1000.0,
        };
        assert!(bar.is_bullish());
        bar.close = 99.0;
        assert!(!bar.is_bullish());
    }

    #[test]
    fn test_timeframe_labels() {
        assert_eq!(Timeframe::OneDay.label(), "1Day");
        assert_eq!(Timeframe::OneMinute.label(), "1Min");
    }
}
