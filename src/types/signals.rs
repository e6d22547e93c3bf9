use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Direction of a detected trade or volume event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeDirection {
    Buy,
    Sell,
}

impl TradeDirection {
    /// Get display label for this direction.
    pub fn label(&self) -> &'static str {
        match self {
            TradeDirection::Buy => "BUY",
            TradeDirection::Sell => "SELL",
        }
    }
}

/// Conviction level of a whale event, derived from the z-score magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conviction {
    Low,
    Medium,
    High,
}

impl Conviction {
    /// Get display label for this conviction level.
    pub fn label(&self) -> &'static str {
        match self {
            Conviction::Low => "LOW",
            Conviction::Medium => "MEDIUM",
            Conviction::High => "HIGH",
        }
    }
}

/// A statistically anomalous volume bar suggesting institutional-size
/// activity. Recomputed on demand; never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhaleEvent {
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub direction: TradeDirection,
    pub volume: f64,
    pub z_score: f64,
    pub close_price: f64,
    /// Percentage change from open to close on the anomalous bar.
    pub price_change_pct: f64,
    pub conviction: Conviction,
}

/// A support or resistance candidate derived from a bar series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceLevel {
    pub price: f64,
    pub bounce_count: u32,
}

/// One contributor to the weighted ensemble.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalComponent {
    pub name: String,
    pub score: f64,
    pub weight: f64,
}

/// Discrete recommendation derived from the ensemble score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Buy,
    Accumulate,
    Wait,
    Distribute,
    Sell,
}

impl Recommendation {
    /// Get display label for this recommendation.
    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::Buy => "BUY",
            Recommendation::Accumulate => "ACCUMULATE",
            Recommendation::Wait => "WAIT",
            Recommendation::Distribute => "DISTRIBUTE",
            Recommendation::Sell => "SELL",
        }
    }

    /// Whether this recommendation leans long.
    pub fn is_bullish(&self) -> bool {
        matches!(self, Recommendation::Buy | Recommendation::Accumulate)
    }

    /// Whether this recommendation leans short.
    pub fn is_bearish(&self) -> bool {
        matches!(self, Recommendation::Sell | Recommendation::Distribute)
    }
}

/// Immutable result of one ensemble evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedSignal {
    pub recommendation: Recommendation,
    /// Weighted ensemble score, roughly within [-3, +3].
    pub score: f64,
    /// |score| / 3 as a percentage. Relative strength, not a probability;
    /// not clamped to 100.
    pub confidence: f64,
    pub reasoning: String,
    pub components: Vec<SignalComponent>,
}

/// Per-instrument result of one screening pass. Created fresh per run and
/// handed to the presentation/persistence collaborator; the engine keeps
/// no history across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockScore {
    pub symbol: String,
    /// Additive criteria-driven heuristic used purely for ranking within a
    /// screening run; separate from the ensemble score.
    pub score: f64,
    pub signals: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atr: Option<f64>,
    pub recommendation: Recommendation,
}

/// Directional setup suggested by RSI/ATR extremes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeSetup {
    pub direction: TradeDirection,
    pub confidence: f64,
    pub reasoning: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_labels() {
        assert_eq!(Recommendation::Buy.label(), "BUY");
        assert_eq!(Recommendation::Wait.label(), "WAIT");
        assert_eq!(Recommendation::Distribute.label(), "DISTRIBUTE");
    }

    #[test]
    fn test_recommendation_lean() {
        assert!(Recommendation::Accumulate.is_bullish());
        assert!(Recommendation::Distribute.is_bearish());
        assert!(!Recommendation::Wait.is_bullish());
        assert!(!Recommendation::Wait.is_bearish());
    }

    #[test]
    fn test_conviction_ordering() {
        assert!(Conviction::High > Conviction::Medium);
        assert!(Conviction::Medium > Conviction::Low);
    }

    #[test]
    fn test_direction_labels() {
        assert_eq!(TradeDirection::Buy.label(), "BUY");
        assert_eq!(TradeDirection::Sell.label(), "SELL");
    }
}
