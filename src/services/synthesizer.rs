//! Weighted ensemble combination of independent signal components.

use crate::services::indicators::{
    find_resistance, find_support, is_at_resistance, is_at_support, CandlePattern,
};
use crate::services::whale::detect_whales;
use crate::types::{Bar, CombinedSignal, Conviction, Recommendation, SignalComponent, TradeDirection};

/// Fixed component weights. Whale flow is weighted highest as it
/// represents institutional-size activity. When a component is missing
/// the remaining weights are NOT renormalized; the ensemble score drifts
/// toward zero as components drop out.
pub const RSI_WEIGHT: f64 = 0.25;
pub const ATR_WEIGHT: f64 = 0.15;
pub const WHALE_WEIGHT: f64 = 0.30;
pub const PATTERN_WEIGHT: f64 = 0.20;
pub const SR_WEIGHT: f64 = 0.10;

/// Convert an RSI value into a bounded component score.
pub fn rsi_score(rsi: f64) -> f64 {
    if rsi < 35.0 {
        3.0
    } else if rsi < 45.0 {
        2.0
    } else if rsi <= 55.0 {
        0.0
    } else if rsi <= 65.0 {
        -2.0
    } else {
        -3.0
    }
}

/// Convert ATR volatility into a component score: healthy volatility
/// (> 3% of price) is mildly positive, a dead-quiet tape (< 0.5%) mildly
/// negative.
pub fn atr_score(atr: f64, close_price: f64) -> f64 {
    if close_price == 0.0 {
        return 0.0;
    }
    let atr_percent = (atr / close_price) * 100.0;

    if atr_percent > 3.0 {
        1.0
    } else if atr_percent < 0.5 {
        -1.0
    } else {
        0.0
    }
}

/// Whale component score from detected events: the side with more
/// HIGH-conviction events controls the signal; ties and absence are
/// neutral.
pub fn whale_score(symbol: &str, bars: &[Bar]) -> f64 {
    let whales = detect_whales(symbol, bars);
    if whales.is_empty() {
        return 0.0;
    }

    let mut buy_count = 0;
    let mut sell_count = 0;
    for whale in &whales {
        if whale.conviction == Conviction::High {
            match whale.direction {
                TradeDirection::Buy => buy_count += 1,
                TradeDirection::Sell => sell_count += 1,
            }
        }
    }

    if buy_count > sell_count {
        3.0
    } else if sell_count > buy_count {
        -3.0
    } else {
        0.0
    }
}

/// Candle pattern component score.
pub fn pattern_score(pattern: CandlePattern) -> f64 {
    match pattern {
        CandlePattern::StrongBullish => 2.0,
        CandlePattern::Bullish | CandlePattern::BullishRejection => 1.0,
        CandlePattern::Doji => 0.0,
        CandlePattern::Bearish | CandlePattern::BearishRejection => -1.0,
        CandlePattern::StrongBearish => -2.0,
    }
}

/// Support/resistance component score for the latest close.
pub fn sr_score(bars: &[Bar]) -> f64 {
    let current_price = match bars.last() {
        Some(bar) => bar.close,
        None => return 0.0,
    };
    let support = find_support(bars);
    let resistance = find_resistance(bars);

    if support > 0.0 && is_at_support(current_price, support) {
        return 1.0;
    }
    if resistance > 0.0 && is_at_resistance(current_price, resistance) {
        return -1.0;
    }
    0.0
}

/// Combine the available indicator outputs into one weighted ensemble.
///
/// RSI and ATR components are omitted entirely when their value is
/// unavailable (insufficient history); the whale, pattern, and
/// support/resistance components are always present, scoring 0 when
/// neutral. The evaluation never fails: a fully degraded input still
/// yields a Wait recommendation with low confidence.
pub fn synthesize(
    rsi_value: Option<f64>,
    atr_value: Option<f64>,
    bars: &[Bar],
    symbol: &str,
    pattern: Option<CandlePattern>,
) -> CombinedSignal {
    let mut components = Vec::new();
    let mut ensemble = 0.0;

    if let Some(rsi) = rsi_value {
        let score = rsi_score(rsi);
        ensemble += score * RSI_WEIGHT;
        components.push(SignalComponent {
            name: "RSI".to_string(),
            score,
            weight: RSI_WEIGHT,
        });
    }

    if let Some(atr) = atr_value {
        if let Some(last) = bars.last() {
            let score = atr_score(atr, last.close);
            ensemble += score * ATR_WEIGHT;
            components.push(SignalComponent {
                name: "ATR".to_string(),
                score,
                weight: ATR_WEIGHT,
            });
        }
    }

    let whale = whale_score(symbol, bars);
    ensemble += whale * WHALE_WEIGHT;
    components.push(SignalComponent {
        name: "Whale".to_string(),
        score: whale,
        weight: WHALE_WEIGHT,
    });

    let pattern_value = pattern.map(pattern_score).unwrap_or(0.0);
    ensemble += pattern_value * PATTERN_WEIGHT;
    components.push(SignalComponent {
        name: "Pattern".to_string(),
        score: pattern_value,
        weight: PATTERN_WEIGHT,
    });

    let sr = sr_score(bars);
    ensemble += sr * SR_WEIGHT;
    components.push(SignalComponent {
        name: "Support/Resistance".to_string(),
        score: sr,
        weight: SR_WEIGHT,
    });

    let (recommendation, reasoning) = if ensemble >= 1.5 {
        (Recommendation::Buy, "Strong buy signals")
    } else if ensemble >= 0.5 {
        (Recommendation::Accumulate, "Moderate buy signals")
    } else if ensemble <= -1.5 {
        (Recommendation::Sell, "Strong sell signals")
    } else if ensemble <= -0.5 {
        (Recommendation::Distribute, "Moderate sell signals")
    } else {
        (Recommendation::Wait, "Neutral signals")
    };

    let confidence = ((ensemble / 3.0) * 100.0).abs();

    CombinedSignal {
        recommendation,
        score: ensemble,
        confidence,
        reasoning: reasoning.to_string(),
        components,
    }
}

/// One-line human-readable rendering of a combined signal.
pub fn format_signal(signal: &CombinedSignal) -> String {
    let marker = if signal.recommendation.is_bullish() {
        "[+]"
    } else if signal.recommendation.is_bearish() {
        "[-]"
    } else {
        "[=]"
    };

    format!(
        "{} {} ({:.0}% confidence) - {}",
        marker,
        signal.recommendation.label(),
        signal.confidence,
        signal.reasoning,
    )
}
