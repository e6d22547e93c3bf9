//! Multiplicative interest scoring.
//!
//! Ranks how attractive an instrument looks for accumulation: a base
//! score is scaled up by intraday weakness, discount to VWAP, quiet
//! volatility, whale activity, and an oversold RSI. Multipliers only
//! ever increase the score; neutral conditions contribute 1.0.

use serde::{Deserialize, Serialize};

use crate::services::indicators::{atr_from_bars, categorize_atr, AtrCategory, VwapCalculator};
use crate::services::whale::detect_whales;
use crate::types::Bar;

/// Starting score before any multiplier is applied.
pub const BASE_SCORE: f64 = 5.0;

/// Inputs to the interest score, pre-extracted from a bar series.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringInput {
    pub current_price: f64,
    /// Open-to-close decline of the latest bar, as a percentage.
    /// Negative when the bar closed up.
    pub price_drop_pct: f64,
    pub vwap_price: f64,
    pub rsi_value: Option<f64>,
    pub atr_category: AtrCategory,
    pub whale_count: usize,
}

/// Qualitative bucket for a computed interest score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreCategory {
    Excellent,
    Good,
    Fair,
    Moderate,
    Poor,
}

impl ScoreCategory {
    pub fn label(&self) -> &'static str {
        match self {
            ScoreCategory::Excellent => "Excellent",
            ScoreCategory::Good => "Good",
            ScoreCategory::Fair => "Fair",
            ScoreCategory::Moderate => "Moderate",
            ScoreCategory::Poor => "Poor",
        }
    }
}

/// Extract scoring inputs from a bar series. Needs at least two bars;
/// shorter series yield `None`.
pub fn build_scoring_input(symbol: &str, bars: &[Bar], rsi_value: Option<f64>) -> Option<ScoringInput> {
    if bars.len() < 2 {
        return None;
    }
    let latest = bars.last()?;

    let price_drop_pct = if latest.open != 0.0 {
        ((latest.open - latest.close) / latest.open) * 100.0
    } else {
        0.0
    };

    let vwap_price = VwapCalculator::new(bars).calculate();
    let atr_value = atr_from_bars(bars);
    let atr_category = categorize_atr(atr_value, bars);
    let whale_count = detect_whales(symbol, bars).len();

    Some(ScoringInput {
        current_price: latest.close,
        price_drop_pct,
        vwap_price,
        rsi_value,
        atr_category,
        whale_count,
    })
}

/// Multiplier rewarding an intraday decline. Each 10% drop adds 10%.
fn price_drop_multiplier(drop_pct: f64) -> f64 {
    if drop_pct > 0.0 {
        1.0 + (drop_pct / 10.0) * 0.1
    } else {
        1.0
    }
}

/// Multiplier rewarding a discount to VWAP. Deeper discounts earn
/// progressively larger multipliers, capped at 1.3.
fn vwap_multiplier(current_price: f64, vwap_price: f64) -> f64 {
    if vwap_price == 0.0 {
        return 1.0;
    }
    let distance_pct = ((current_price - vwap_price) / vwap_price) * 100.0;
    if distance_pct >= 0.0 {
        return 1.0;
    }

    let discount = distance_pct.abs();
    if discount <= 5.0 {
        1.0 + (discount / 5.0) * 0.05
    } else if discount <= 15.0 {
        1.05 + ((discount - 5.0) / 10.0) * 0.10
    } else if discount <= 30.0 {
        1.15 + ((discount - 15.0) / 15.0) * 0.15
    } else {
        1.3
    }
}

/// Compute the interest score from pre-extracted inputs.
pub fn interest_score(input: &ScoringInput) -> f64 {
    let mut score = BASE_SCORE;

    score *= price_drop_multiplier(input.price_drop_pct);
    score *= vwap_multiplier(input.current_price, input.vwap_price);

    // Quiet tape suggests accumulation is cheap
    if input.atr_category == AtrCategory::Low {
        score *= 1.2;
    }
    if input.whale_count > 0 {
        score *= 1.2;
    }
    if let Some(rsi) = input.rsi_value {
        if rsi < 30.0 {
            score *= 1.1;
        }
    }

    score
}

/// Bucket an interest score for display.
pub fn score_category(score: f64) -> ScoreCategory {
    if score >= 8.0 {
        ScoreCategory::Excellent
    } else if score >= 6.0 {
        ScoreCategory::Good
    } else if score >= 4.0 {
        ScoreCategory::Fair
    } else if score >= 2.0 {
        ScoreCategory::Moderate
    } else {
        ScoreCategory::Poor
    }
}
