//! Volume anomaly ("whale") detection.
//!
//! Flags bars whose volume deviates abnormally from a trailing baseline,
//! suggesting institutional-size activity.

use crate::services::indicators::rsi::average;
use crate::types::{Bar, Conviction, TradeDirection, WhaleEvent};

/// Trailing baseline window, exclusive of the bar under test.
pub const BASELINE_WINDOW: usize = 20;

/// Z-score above which a bar counts as anomalous.
pub const ANOMALY_THRESHOLD: f64 = 2.0;

/// Z-score above which conviction is High rather than Medium.
pub const HIGH_CONVICTION_THRESHOLD: f64 = 3.0;

/// Mean and population standard deviation of a volume window.
pub fn volume_stats(volumes: &[f64]) -> (f64, f64) {
    let mean = average(volumes);
    if volumes.is_empty() {
        return (mean, 0.0);
    }
    let variance =
        volumes.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / volumes.len() as f64;
    (mean, variance.sqrt())
}

/// Standardized deviation of `current_volume` from the baseline. Returns
/// 0.0 when the baseline has no variance (never divides by zero).
pub fn z_score(current_volume: f64, mean: f64, std_dev: f64) -> f64 {
    if std_dev == 0.0 {
        return 0.0;
    }
    (current_volume - mean) / std_dev
}

/// Trailing average of the last `window` volumes. 0.0 for an empty input.
pub fn average_volume(volumes: &[f64], window: usize) -> f64 {
    if volumes.is_empty() {
        return 0.0;
    }
    let window = window.min(volumes.len());
    average(&volumes[volumes.len() - window..])
}

/// Scan a chronologically ascending bar series for volume anomalies.
///
/// For each bar from position `BASELINE_WINDOW` onward, the z-score is
/// computed against the mean and population standard deviation of the 20
/// preceding volumes (exclusive of the bar itself). A series shorter than
/// 21 bars yields no events; insufficient history is a valid "nothing
/// detected" outcome, not an error.
pub fn detect_whales(symbol: &str, bars: &[Bar]) -> Vec<WhaleEvent> {
    let mut events = Vec::new();
    if bars.len() <= BASELINE_WINDOW {
        return events;
    }

    for i in BASELINE_WINDOW..bars.len() {
        let baseline: Vec<f64> = bars[i - BASELINE_WINDOW..i].iter().map(|b| b.volume).collect();
        let (mean, std_dev) = volume_stats(&baseline);
        let z = z_score(bars[i].volume, mean, std_dev);

        if z <= ANOMALY_THRESHOLD {
            continue;
        }

        let bar = &bars[i];
        let direction = if bar.close > bar.open {
            TradeDirection::Buy
        } else {
            TradeDirection::Sell
        };
        let conviction = if z > HIGH_CONVICTION_THRESHOLD {
            Conviction::High
        } else {
            Conviction::Medium
        };
        let price_change_pct = if bar.open != 0.0 {
            ((bar.close - bar.open) / bar.open) * 100.0
        } else {
            0.0
        };

        events.push(WhaleEvent {
            timestamp: bar.timestamp,
            symbol: symbol.to_string(),
            direction,
            volume: bar.volume,
            z_score: z,
            close_price: bar.close,
            price_change_pct,
            conviction,
        });
    }

    events
}
