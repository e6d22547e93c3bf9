//! Directional trade setup detection from RSI and ATR extremes.

use tracing::debug;

use crate::config::ScreenerCriteria;
use crate::types::{TradeDirection, TradeSetup};

/// Look for a long setup: RSI below the oversold threshold with enough
/// volatility to make the trade worth taking. Both indicator values are
/// required; `None` means no setup, not an error.
pub fn analyze_for_long(
    symbol: &str,
    rsi: Option<f64>,
    atr: Option<f64>,
    criteria: &ScreenerCriteria,
) -> Option<TradeSetup> {
    let rsi = rsi?;
    let atr = atr?;

    if rsi >= criteria.min_oversold_rsi || atr < criteria.min_atr {
        return None;
    }

    // Deeper oversold readings earn higher confidence
    let confidence = ((1.0 - rsi / criteria.min_oversold_rsi) * 100.0).min(100.0);
    debug!(symbol, rsi, atr, confidence, "long setup detected");

    Some(TradeSetup {
        direction: TradeDirection::Buy,
        confidence,
        reasoning: format!("RSI {:.1} oversold with ATR {:.2}", rsi, atr),
    })
}

/// Look for a short setup: RSI above the overbought ceiling with enough
/// volatility present.
pub fn analyze_for_short(
    symbol: &str,
    rsi: Option<f64>,
    atr: Option<f64>,
    criteria: &ScreenerCriteria,
) -> Option<TradeSetup> {
    let rsi = rsi?;
    let atr = atr?;

    if rsi <= criteria.max_rsi || atr < criteria.min_atr {
        return None;
    }

    let confidence = ((rsi - criteria.max_rsi) / (100.0 - criteria.max_rsi)) * 100.0;
    debug!(symbol, rsi, atr, confidence, "short setup detected");

    Some(TradeSetup {
        direction: TradeDirection::Sell,
        confidence,
        reasoning: format!("RSI {:.1} overbought with ATR {:.2}", rsi, atr),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criteria() -> ScreenerCriteria {
        ScreenerCriteria::default()
    }

    #[test]
    fn test_long_setup_on_oversold() {
        let setup = analyze_for_long("AAPL", Some(20.0), Some(1.5), &criteria()).unwrap();
        assert_eq!(setup.direction, TradeDirection::Buy);
        // 1 - 20/35 = 0.4286 -> ~42.9%
        assert!((setup.confidence - (1.0 - 20.0 / 35.0) * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_long_without_oversold_rsi() {
        assert!(analyze_for_long("AAPL", Some(50.0), Some(1.5), &criteria()).is_none());
    }

    #[test]
    fn test_no_long_without_volatility() {
        assert!(analyze_for_long("AAPL", Some(20.0), Some(0.05), &criteria()).is_none());
    }

    #[test]
    fn test_long_requires_both_indicators() {
        assert!(analyze_for_long("AAPL", None, Some(1.5), &criteria()).is_none());
        assert!(analyze_for_long("AAPL", Some(20.0), None, &criteria()).is_none());
    }

    #[test]
    fn test_long_confidence_capped() {
        // RSI of 0 would compute exactly 100; make sure the cap holds
        let setup = analyze_for_long("AAPL", Some(0.0), Some(1.5), &criteria()).unwrap();
        assert!(setup.confidence <= 100.0);
    }

    #[test]
    fn test_short_setup_on_overbought() {
        let setup = analyze_for_short("TSLA", Some(85.0), Some(2.0), &criteria()).unwrap();
        assert_eq!(setup.direction, TradeDirection::Sell);
        // (85 - 75) / 25 = 40%
        assert!((setup.confidence - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_short_below_ceiling() {
        assert!(analyze_for_short("TSLA", Some(70.0), Some(2.0), &criteria()).is_none());
    }
}
