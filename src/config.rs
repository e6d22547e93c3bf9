use std::env;

/// Thresholds configuring what the screener counts as "interesting".
/// Supplied by the caller and treated as read-only for the whole run.
#[derive(Debug, Clone)]
pub struct ScreenerCriteria {
    /// RSI below this counts as oversold.
    pub min_oversold_rsi: f64,
    /// RSI above this counts as overbought.
    pub max_rsi: f64,
    /// Minimum ATR to flag elevated volatility.
    pub min_atr: f64,
    /// Minimum ratio of latest volume to its 20-bar average.
    pub min_volume_ratio: f64,
}

impl Default for ScreenerCriteria {
    fn default() -> Self {
        Self {
            min_oversold_rsi: 35.0,
            max_rsi: 75.0,
            min_atr: 0.1,
            min_volume_ratio: 1.0,
        }
    }
}

impl ScreenerCriteria {
    /// Load criteria from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            min_oversold_rsi: env::var("SCREENER_MIN_OVERSOLD_RSI")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.min_oversold_rsi),
            max_rsi: env::var("SCREENER_MAX_RSI")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_rsi),
            min_atr: env::var("SCREENER_MIN_ATR")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.min_atr),
            min_volume_ratio: env::var("SCREENER_MIN_VOLUME_RATIO")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.min_volume_ratio),
        }
    }
}
