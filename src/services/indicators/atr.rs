//! Average True Range (ATR) indicator.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::services::indicators::rsi::average;
use crate::types::Bar;

/// Relative volatility band for an ATR value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtrCategory {
    Low,
    Normal,
    High,
}

impl AtrCategory {
    pub fn label(&self) -> &'static str {
        match self {
            AtrCategory::Low => "LOW",
            AtrCategory::Normal => "NORMAL",
            AtrCategory::High => "HIGH",
        }
    }
}

/// True Range for a bar given the previous close, capturing gap risk:
/// max(high - low, |high - prev_close|, |low - prev_close|).
pub fn true_range(high: f64, low: f64, prev_close: f64) -> f64 {
    (high - low)
        .max((high - prev_close).abs())
        .max((low - prev_close).abs())
}

/// Calculate ATR over a chronologically ascending bar series.
///
/// The first bar has no true range (no previous close) and is excluded
/// from every window rather than treated as zero volatility. Positions
/// before `period` have no result; from `period` onward the value is the
/// arithmetic mean of the trailing `period` true ranges.
pub fn atr(bars: &[Bar], period: usize) -> Result<Vec<Option<f64>>> {
    if bars.len() < period + 1 {
        return Err(EngineError::insufficient(period + 1, bars.len()));
    }

    let mut true_ranges = vec![0.0; bars.len()];
    for i in 1..bars.len() {
        true_ranges[i] = true_range(bars[i].high, bars[i].low, bars[i - 1].close);
    }

    let mut values = vec![None; bars.len()];
    for i in period..bars.len() {
        values[i] = Some(average(&true_ranges[i - period + 1..=i]));
    }

    Ok(values)
}

/// Latest defined ATR value for a bar series.
pub fn latest_atr(bars: &[Bar], period: usize) -> Result<f64> {
    let values = atr(bars, period)?;
    values
        .iter()
        .rev()
        .find_map(|v| *v)
        .ok_or_else(|| EngineError::insufficient(period + 1, bars.len()))
}

/// ATR from whatever history is available, shrinking the window when the
/// series is shorter than the standard 14-bar period. Returns 0.0 for
/// fewer than two bars. Used by the watchlist interest score where a hard
/// failure on short history is not useful.
pub fn atr_from_bars(bars: &[Bar]) -> f64 {
    if bars.len() < 2 {
        return 0.0;
    }

    let mut true_ranges = vec![0.0; bars.len()];
    for i in 1..bars.len() {
        true_ranges[i] = true_range(bars[i].high, bars[i].low, bars[i - 1].close);
    }

    let mut period = 14;
    if true_ranges.len() < period {
        period = true_ranges.len() - 1;
    }

    average(&true_ranges[true_ranges.len() - period..])
}

/// Categorize the current ATR against its recent 14-bar average.
pub fn categorize_atr(current_atr: f64, bars: &[Bar]) -> AtrCategory {
    if bars.len() < 15 {
        return AtrCategory::Normal;
    }

    let mut atr_values = Vec::new();
    for i in bars.len() - 14..bars.len() {
        let value = atr_from_bars(&bars[..=i]);
        if value > 0.0 {
            atr_values.push(value);
        }
    }

    if atr_values.is_empty() {
        return AtrCategory::Normal;
    }

    let avg_atr = average(&atr_values);
    if current_atr < avg_atr * 0.5 {
        AtrCategory::Low
    } else if current_atr > avg_atr * 1.5 {
        AtrCategory::High
    } else {
        AtrCategory::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn bar(high: f64, low: f64, close: f64) -> Bar {
        Bar {
            timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            open: close,
            high,
            low,
            close,
            volume: 1000.0,
        }
    }

    #[test]
    fn test_atr_known_values() {
        let bars = vec![
            bar(15.0, 10.0, 12.0),
            bar(16.0, 11.0, 15.0),
            bar(18.0, 14.0, 17.0),
            bar(50.0, 20.0, 35.0),
            bar(25.0, 12.0, 20.0),
        ];
        let values = atr(&bars, 3).unwrap();
        assert_eq!(values[0], None);
        assert_eq!(values[1], None);
        assert_eq!(values[2], None);
        assert!((values[3].unwrap() - 14.0).abs() < 1e-5);
        assert!((values[4].unwrap() - 20.0).abs() < 1e-5);
    }

    #[test]
    fn test_true_range_no_gap() {
        assert!((true_range(15.0, 10.0, 12.0) - 5.0).abs() < 1e-9);
        assert!((true_range(16.0, 12.0, 14.0) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_true_range_with_gaps() {
        // Gap up: previous close below today's low
        assert!((true_range(18.0, 14.0, 10.0) - 8.0).abs() < 1e-9);
        // Gap down: previous close above today's high
        assert!((true_range(12.0, 8.0, 15.0) - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_atr_high_volatility() {
        let bars = vec![
            bar(110.0, 100.0, 105.0),
            bar(120.0, 105.0, 118.0),
            bar(125.0, 112.0, 115.0),
            bar(130.0, 115.0, 125.0),
        ];
        let values = atr(&bars, 3).unwrap();
        assert!((values[3].unwrap() - 14.333333333).abs() < 1e-5);
    }

    #[test]
    fn test_atr_insufficient_data() {
        let bars = vec![
            bar(100.0, 95.0, 98.0),
            bar(102.0, 97.0, 100.0),
            bar(101.0, 96.0, 99.0),
            bar(103.0, 98.0, 101.0),
        ];
        let err = atr(&bars, 14).unwrap_err();
        assert!(matches!(
            err,
            crate::error::EngineError::InsufficientData { needed: 15, got: 4 }
        ));
    }

    #[test]
    fn test_atr_from_bars_short_series() {
        assert_eq!(atr_from_bars(&[bar(100.0, 95.0, 98.0)]), 0.0);

        let bars = vec![bar(100.0, 95.0, 98.0), bar(102.0, 97.0, 100.0)];
        // Single true range of 5.0
        assert!((atr_from_bars(&bars) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_categorize_atr_short_history_is_normal() {
        let bars = vec![bar(100.0, 95.0, 98.0); 5];
        assert_eq!(categorize_atr(1.0, &bars), AtrCategory::Normal);
    }

    #[test]
    fn test_categorize_atr_bands() {
        let bars: Vec<Bar> = (0..30).map(|_| bar(102.0, 98.0, 100.0)).collect();
        // Steady 4.0 true ranges: well below half => LOW, well above 1.5x => HIGH
        assert_eq!(categorize_atr(1.0, &bars), AtrCategory::Low);
        assert_eq!(categorize_atr(10.0, &bars), AtrCategory::High);
        assert_eq!(categorize_atr(4.0, &bars), AtrCategory::Normal);
    }
}
