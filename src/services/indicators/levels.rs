//! Support and resistance level detection.

use crate::types::{Bar, PriceLevel};

/// Tolerance band for "at support/resistance" checks: 1% of the level.
const LEVEL_TOLERANCE: f64 = 0.01;

/// Price must be this far beyond a level to count as a breakout: 0.5%.
const BREAKOUT_MARGIN: f64 = 0.005;

/// Global support: the minimum low over the series. Extrema over fewer
/// than three bars are not meaningful, so short series yield 0.0.
pub fn find_support(bars: &[Bar]) -> f64 {
    if bars.len() < 3 {
        return 0.0;
    }
    bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min)
}

/// Global resistance: the maximum high over the series. Short series
/// yield 0.0, matching `find_support`.
pub fn find_resistance(bars: &[Bar]) -> f64 {
    if bars.len() < 3 {
        return 0.0;
    }
    bars.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max)
}

/// Local resistance candidates: bars whose high is strictly greater than
/// both immediate neighbors.
pub fn local_resistance_levels(bars: &[Bar]) -> Vec<PriceLevel> {
    let mut levels = Vec::new();
    for i in 1..bars.len().saturating_sub(1) {
        if bars[i].high > bars[i - 1].high && bars[i].high > bars[i + 1].high {
            levels.push(PriceLevel {
                price: bars[i].high,
                bounce_count: 1,
            });
        }
    }
    levels
}

/// Local support candidates: bars whose low is strictly less than both
/// immediate neighbors.
pub fn local_support_levels(bars: &[Bar]) -> Vec<PriceLevel> {
    let mut levels = Vec::new();
    for i in 1..bars.len().saturating_sub(1) {
        if bars[i].low < bars[i - 1].low && bars[i].low < bars[i + 1].low {
            levels.push(PriceLevel {
                price: bars[i].low,
                bounce_count: 1,
            });
        }
    }
    levels
}

/// Whether the current price is within 1% of the support level.
pub fn is_at_support(current_price: f64, support: f64) -> bool {
    let tolerance = support * LEVEL_TOLERANCE;
    current_price >= support - tolerance && current_price <= support + tolerance
}

/// Whether the current price is within 1% of the resistance level.
pub fn is_at_resistance(current_price: f64, resistance: f64) -> bool {
    let tolerance = resistance * LEVEL_TOLERANCE;
    current_price >= resistance - tolerance && current_price <= resistance + tolerance
}

/// Breakout above resistance: price more than 0.5% beyond the level.
pub fn is_breakout_above(current_price: f64, resistance: f64) -> bool {
    resistance > 0.0 && current_price > resistance * (1.0 + BREAKOUT_MARGIN)
}

/// Breakout below support: price more than 0.5% under the level.
pub fn is_breakout_below(current_price: f64, support: f64) -> bool {
    support > 0.0 && current_price < support * (1.0 - BREAKOUT_MARGIN)
}

/// Classic pivot point: (high + low + close) / 3 of the most recent bar.
pub fn pivot_point(bars: &[Bar]) -> f64 {
    match bars.last() {
        Some(bar) => bar.typical_price(),
        None => 0.0,
    }
}

/// Percentage distance from the current price down to support. 0.0 when
/// support is 0 (division guard).
pub fn distance_to_support(current_price: f64, support: f64) -> f64 {
    if support == 0.0 {
        return 0.0;
    }
    ((current_price - support) / support) * 100.0
}

/// Percentage distance from the current price up to resistance. 0.0 when
/// resistance is 0 (division guard).
pub fn distance_to_resistance(current_price: f64, resistance: f64) -> f64 {
    if resistance == 0.0 {
        return 0.0;
    }
    ((resistance - current_price) / resistance) * 100.0
}
