//! Single-bar candlestick measurement and pattern classification.

use crate::types::Bar;
use serde::{Deserialize, Serialize};

/// Measurements for one candle. All ratios are division-guarded: a zero
/// range or zero wick yields 0.0 rather than NaN/Inf.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandleMetrics {
    pub body: f64,
    pub range: f64,
    /// Body as a percentage of the full range.
    pub body_pct: f64,
    pub upper_wick: f64,
    pub lower_wick: f64,
    /// Upper wick as a percentage of the full range.
    pub upper_pct: f64,
    /// Lower wick as a percentage of the full range.
    pub lower_pct: f64,
    pub body_to_upper: f64,
    pub body_to_lower: f64,
}

/// Primary shape classification of a single candle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandlePattern {
    StrongBullish,
    Bullish,
    Doji,
    Bearish,
    StrongBearish,
    BullishRejection,
    BearishRejection,
}

impl CandlePattern {
    pub fn label(&self) -> &'static str {
        match self {
            CandlePattern::StrongBullish => "Strong Bullish",
            CandlePattern::Bullish => "Bullish",
            CandlePattern::Doji => "Doji",
            CandlePattern::Bearish => "Bearish",
            CandlePattern::StrongBearish => "Strong Bearish",
            CandlePattern::BullishRejection => "Bullish Rejection",
            CandlePattern::BearishRejection => "Bearish Rejection",
        }
    }
}

/// Confidence-scored pattern that also considers volume and volatility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextPattern {
    BullishHammer,
    StrongBullish,
    BullishEngulfingPotential,
    BearishShootingStar,
    StrongBearish,
    Neutral,
}

impl ContextPattern {
    pub fn label(&self) -> &'static str {
        match self {
            ContextPattern::BullishHammer => "Bullish Hammer",
            ContextPattern::StrongBullish => "Strong Bullish",
            ContextPattern::BullishEngulfingPotential => "Bullish Engulfing Potential",
            ContextPattern::BearishShootingStar => "Bearish Shooting Star",
            ContextPattern::StrongBearish => "Strong Bearish",
            ContextPattern::Neutral => "Neutral",
        }
    }
}

/// Bullish/bearish balance over a lookback of recent candles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandleTrend {
    pub bullish_count: usize,
    pub bearish_count: usize,
    pub latest_pattern: CandlePattern,
}

impl CandleTrend {
    /// One-line trend summary over the lookback window.
    pub fn summary(&self, lookback: usize) -> String {
        let latest = self.latest_pattern.label();
        if lookback == 1 {
            return latest.to_string();
        }
        if self.bullish_count > self.bearish_count {
            format!("Bullish Trend ({}/{}, Latest: {})", self.bullish_count, lookback, latest)
        } else if self.bearish_count > self.bullish_count {
            format!("Bearish Trend ({}/{}, Latest: {})", self.bearish_count, lookback, latest)
        } else {
            format!("Mixed Trend (Latest: {})", latest)
        }
    }
}

/// Measure a candle's body, range, wicks, and ratios.
pub fn measure(bar: &Bar) -> CandleMetrics {
    let body = (bar.close - bar.open).abs();
    let range = bar.high - bar.low;
    let body_pct = if range != 0.0 { (body / range) * 100.0 } else { 0.0 };

    let upper_wick = bar.high - bar.open.max(bar.close);
    let lower_wick = bar.open.min(bar.close) - bar.low;
    let upper_pct = if range != 0.0 { (upper_wick / range) * 100.0 } else { 0.0 };
    let lower_pct = if range != 0.0 { (lower_wick / range) * 100.0 } else { 0.0 };

    let body_to_upper = if upper_wick != 0.0 { body / upper_wick } else { 0.0 };
    let body_to_lower = if lower_wick != 0.0 { body / lower_wick } else { 0.0 };

    CandleMetrics {
        body,
        range,
        body_pct,
        upper_wick,
        lower_wick,
        upper_pct,
        lower_pct,
        body_to_upper,
        body_to_lower,
    }
}

/// Classify a single candle by shape.
///
/// Priority order: tiny bodies (< 10% of range) split into rejection
/// candles on a dominant wick (> 70% of range) or a doji; then bullish
/// and bearish candles split on body percentage at 60%.
pub fn classify(bar: &Bar) -> CandlePattern {
    let m = measure(bar);

    if m.body_pct < 10.0 {
        if m.upper_pct > 70.0 {
            return CandlePattern::BearishRejection;
        }
        if m.lower_pct > 70.0 {
            return CandlePattern::BullishRejection;
        }
        return CandlePattern::Doji;
    }

    if bar.close > bar.open {
        if m.body_pct > 60.0 {
            CandlePattern::StrongBullish
        } else {
            CandlePattern::Bullish
        }
    } else if m.body_pct > 60.0 {
        CandlePattern::StrongBearish
    } else {
        CandlePattern::Bearish
    }
}

/// Classify a candle with volatility and volume context.
///
/// Hammer/shooting-star shapes need the long wick to be at least 1.5x the
/// body opposite the close direction with the other wick under 0.5x the
/// body. Confidence is boosted by 0.1 when the body exceeds 1.5x ATR and
/// by 0.1 when volume exceeds 1.5x its 20-bar average, clamped to [0, 1].
pub fn classify_with_context(
    bar: &Bar,
    atr: Option<f64>,
    avg_vol_20: f64,
    volume: f64,
) -> (ContextPattern, f64) {
    let m = measure(bar);

    let body_over_atr = match atr {
        Some(a) if a != 0.0 => m.body / a,
        _ => 0.0,
    };
    let vol_ratio = if avg_vol_20 != 0.0 { volume / avg_vol_20 } else { 0.0 };

    let mut signal = ContextPattern::Neutral;
    let mut confidence: f64 = 0.0;

    if m.lower_wick > m.body * 1.5 && m.upper_wick < m.body * 0.5 && bar.close > bar.open {
        signal = ContextPattern::BullishHammer;
        confidence = 0.8;
    } else if m.body_pct > 70.0 && bar.close > bar.open && vol_ratio > 1.2 {
        signal = ContextPattern::StrongBullish;
        confidence = 0.9;
    } else if m.body_to_lower > 2.0 && bar.close > bar.open {
        signal = ContextPattern::BullishEngulfingPotential;
        confidence = 0.7;
    }

    if m.upper_wick > m.body * 1.5 && m.lower_wick < m.body * 0.5 && bar.close < bar.open {
        signal = ContextPattern::BearishShootingStar;
        confidence = 0.8;
    } else if m.body_pct > 70.0 && bar.close < bar.open && vol_ratio > 1.2 {
        signal = ContextPattern::StrongBearish;
        confidence = 0.9;
    }

    if body_over_atr > 1.5 {
        confidence += 0.1;
    }
    if vol_ratio > 1.5 {
        confidence += 0.1;
    }

    (signal, confidence.clamp(0.0, 1.0))
}

/// Summarize the bullish/bearish balance of the last `lookback` candles.
/// Returns None for an empty series.
pub fn recent_trend(bars: &[Bar], lookback: usize) -> Option<CandleTrend> {
    let last = bars.last()?;
    let window = lookback.min(bars.len());
    let recent = &bars[bars.len() - window..];

    let mut bullish_count = 0;
    let mut bearish_count = 0;
    for bar in recent {
        if bar.close > bar.open {
            bullish_count += 1;
        } else if bar.close < bar.open {
            bearish_count += 1;
        }
    }

    Some(CandleTrend {
        bullish_count,
        bearish_count,
        latest_pattern: classify(last),
    })
}
