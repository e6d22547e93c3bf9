//! Multi-symbol screening pipeline.
//!
//! Pulls bars for each candidate symbol, derives indicator values
//! (preferring a configured `IndicatorStore`, computing from bars
//! otherwise), applies additive criteria scoring, and attaches the
//! weighted ensemble recommendation. A failure on one symbol is logged
//! and skipped; it never aborts the run.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::ScreenerCriteria;
use crate::error::{EngineError, Result};
use crate::services::indicators::{
    classify, find_resistance, find_support, latest_atr, latest_rsi,
};
use crate::services::providers::{
    IndicatorKind, IndicatorStore, MarketData, Sentiment, SentimentFeed,
};
use crate::services::synthesizer::{format_signal, synthesize};
use crate::services::whale::{average_volume, detect_whales};
use crate::types::{Bar, Conviction, StockScore, Timeframe};

/// Lookback period used when an indicator has to be computed from bars.
pub const INDICATOR_PERIOD: usize = 14;

/// Screening pipeline over caller-supplied collaborators. The indicator
/// store and sentiment feed are optional; the screener degrades to
/// bar-derived indicators and no sentiment boost without them.
pub struct Screener<'a> {
    market: &'a dyn MarketData,
    store: Option<&'a dyn IndicatorStore>,
    sentiment: Option<&'a dyn SentimentFeed>,
}

impl<'a> Screener<'a> {
    pub fn new(market: &'a dyn MarketData) -> Self {
        Self {
            market,
            store: None,
            sentiment: None,
        }
    }

    pub fn with_store(mut self, store: &'a dyn IndicatorStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_sentiment(mut self, sentiment: &'a dyn SentimentFeed) -> Self {
        self.sentiment = Some(sentiment);
        self
    }

    /// Screen a list of symbols and return scores sorted best-first.
    pub fn screen(
        &self,
        symbols: &[&str],
        timeframe: Timeframe,
        num_bars: usize,
        criteria: &ScreenerCriteria,
    ) -> Vec<StockScore> {
        info!(count = symbols.len(), timeframe = timeframe.label(), "screening symbols");

        let mut results = Vec::new();
        for symbol in symbols {
            match self.score_symbol(symbol, timeframe, num_bars, criteria) {
                Ok(Some(score)) => results.push(score),
                Ok(None) => debug!(symbol, "no data available, excluded"),
                Err(err) => warn!(symbol, error = %err, "failed to score symbol"),
            }
        }

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        info!(scored = results.len(), "screening complete");
        results
    }

    fn score_symbol(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        num_bars: usize,
        criteria: &ScreenerCriteria,
    ) -> Result<Option<StockScore>> {
        let bars = self.market.fetch_bars(symbol, timeframe, num_bars, None)?;
        if bars.len() < 2 {
            return Err(EngineError::insufficient(2, bars.len()));
        }
        // Ascending series: the last bar is the most recent
        let latest = &bars[bars.len() - 1];
        let current_price = latest.close;

        let rsi_value = self.latest_indicator(symbol, IndicatorKind::Rsi, &bars);
        let atr_value = self.latest_indicator(symbol, IndicatorKind::Atr, &bars);

        let mut score = 0.0;
        let mut signals: Vec<String> = Vec::new();

        if let Some(rsi) = rsi_value {
            if rsi < criteria.min_oversold_rsi {
                score += 20.0;
                signals.push(format!("RSI Oversold: {:.2}", rsi));
            } else if rsi > criteria.max_rsi {
                score -= 10.0;
                signals.push(format!("RSI Overbought: {:.2}", rsi));
            } else {
                score += 5.0;
            }
        }

        if let Some(atr) = atr_value {
            if atr > criteria.min_atr {
                score += 10.0;
                signals.push(format!("High Volatility ATR: {:.2}", atr));
            }
        }

        // Volume ratio against the trailing 20-bar average, excluding the
        // bar under test so a spike does not inflate its own baseline
        let volumes: Vec<f64> = bars[..bars.len() - 1].iter().map(|b| b.volume).collect();
        let avg_volume = average_volume(&volumes, 20);
        if avg_volume > 0.0 {
            let volume_ratio = latest.volume / avg_volume;
            if volume_ratio > criteria.min_volume_ratio {
                score += 15.0;
                signals.push(format!("High Volume: {:.1}x avg", volume_ratio));
            }
        }

        if let Some(feed) = self.sentiment {
            match feed.latest_sentiment(symbol) {
                Ok(Some(Sentiment::Positive)) => score += 10.0,
                Ok(_) => {}
                Err(err) => warn!(symbol, error = %err, "sentiment lookup failed"),
            }
        }

        for whale in detect_whales(symbol, &bars) {
            if whale.conviction == Conviction::High {
                score += 5.0;
                signals.push(format!("Whale {}: Z={:.2}", whale.direction.label(), whale.z_score));
            }
        }

        let support = find_support(&bars);
        let resistance = find_resistance(&bars);
        if support > 0.0 && current_price < support * 1.01 {
            score += 15.0;
            signals.push(format!("Near Support: ${:.2}", support));
        }
        if resistance > 0.0 && current_price > resistance * 0.99 {
            score -= 10.0;
            signals.push(format!("Near Resistance: ${:.2}", resistance));
        }

        // Nothing measurable at all for this symbol
        if score == 0.0 && signals.is_empty() && rsi_value.is_none() && atr_value.is_none() {
            return Ok(None);
        }

        let combined = synthesize(rsi_value, atr_value, &bars, symbol, Some(classify(latest)));
        signals.push(format!("Final: {}", format_signal(&combined)));

        Ok(Some(StockScore {
            symbol: symbol.to_string(),
            score,
            signals,
            rsi: rsi_value,
            atr: atr_value,
            recommendation: combined.recommendation,
        }))
    }

    /// Latest indicator value: stored series first, computed from bars as
    /// a fallback (persisting the computed value when a store is present).
    fn latest_indicator(&self, symbol: &str, kind: IndicatorKind, bars: &[Bar]) -> Option<f64> {
        if let Some(value) = self.stored_latest(symbol, kind, bars) {
            return Some(value);
        }

        let computed = match kind {
            IndicatorKind::Rsi => {
                let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
                latest_rsi(&closes, INDICATOR_PERIOD).ok()
            }
            IndicatorKind::Atr => latest_atr(bars, INDICATOR_PERIOD).ok(),
        }?;

        if let Some(store) = self.store {
            if let Some(last) = bars.last() {
                if let Err(err) = store.save_value(symbol, kind, last.timestamp, computed) {
                    warn!(symbol, kind = kind.label(), error = %err, "failed to persist indicator");
                }
            }
        }
        Some(computed)
    }

    fn stored_latest(&self, symbol: &str, kind: IndicatorKind, bars: &[Bar]) -> Option<f64> {
        let store = self.store?;
        let start = bars.first()?.timestamp;
        match store.fetch_series(symbol, kind, start, Utc::now()) {
            Ok(series) => series.values().next_back().copied(),
            Err(err) => {
                warn!(symbol, kind = kind.label(), error = %err, "indicator store unavailable");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::cache::IndicatorCache;
    use chrono::{Duration, TimeZone};
    use std::collections::HashMap;

    struct StaticMarket {
        bars: HashMap<String, Vec<Bar>>,
    }

    impl MarketData for StaticMarket {
        fn fetch_bars(
            &self,
            symbol: &str,
            _timeframe: Timeframe,
            limit: usize,
            _start: Option<chrono::DateTime<Utc>>,
        ) -> Result<Vec<Bar>> {
            match self.bars.get(symbol) {
                Some(bars) => Ok(bars.iter().rev().take(limit).rev().cloned().collect()),
                None => Err(EngineError::Collaborator(format!("unknown symbol {symbol}"))),
            }
        }
    }

    struct AlwaysPositive;

    impl SentimentFeed for AlwaysPositive {
        fn latest_sentiment(&self, _symbol: &str) -> Result<Option<Sentiment>> {
            Ok(Some(Sentiment::Positive))
        }
    }

    fn series(len: usize, close_step: f64, volume: f64) -> Vec<Bar> {
        (0..len)
            .map(|i| {
                let base = 100.0 + i as f64 * close_step;
                Bar {
                    timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap()
                        + Duration::minutes(i as i64),
                    open: base,
                    high: base + 2.0,
                    low: base - 2.0,
                    close: base + close_step,
                    volume,
                }
            })
            .collect()
    }

    fn market_with(symbol: &str, bars: Vec<Bar>) -> StaticMarket {
        let mut map = HashMap::new();
        map.insert(symbol.to_string(), bars);
        StaticMarket { bars: map }
    }

    #[test]
    fn test_declining_series_flags_oversold() {
        let market = market_with("AAPL", series(30, -1.0, 1000.0));
        let screener = Screener::new(&market);
        let results = screener.screen(
            &["AAPL"],
            Timeframe::OneDay,
            30,
            &ScreenerCriteria::default(),
        );

        assert_eq!(results.len(), 1);
        let top = &results[0];
        assert!(top.rsi.is_some());
        assert!(top.rsi.unwrap() < 35.0, "rsi {:?}", top.rsi);
        assert!(top.signals.iter().any(|s| s.starts_with("RSI Oversold")));
        assert!(top.signals.iter().any(|s| s.starts_with("High Volatility ATR")));
        // Oversold +20 and elevated ATR +10
        assert!(top.score >= 30.0, "score {}", top.score);
    }

    #[test]
    fn test_failed_symbol_is_skipped() {
        let market = market_with("AAPL", series(30, -1.0, 1000.0));
        let screener = Screener::new(&market);
        let results = screener.screen(
            &["MISSING", "AAPL"],
            Timeframe::OneDay,
            30,
            &ScreenerCriteria::default(),
        );
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].symbol, "AAPL");
    }

    #[test]
    fn test_results_sorted_descending() {
        let mut map = HashMap::new();
        map.insert("DOWN".to_string(), series(30, -1.0, 1000.0));
        map.insert("UP".to_string(), series(30, 1.0, 1000.0));
        let market = StaticMarket { bars: map };
        let screener = Screener::new(&market);

        let results = screener.screen(
            &["UP", "DOWN"],
            Timeframe::OneDay,
            30,
            &ScreenerCriteria::default(),
        );
        assert_eq!(results.len(), 2);
        assert!(results[0].score >= results[1].score);
        // The oversold decliner outranks the overbought climber
        assert_eq!(results[0].symbol, "DOWN");
    }

    #[test]
    fn test_sentiment_boost() {
        let market = market_with("AAPL", series(30, 0.5, 1000.0));
        let feed = AlwaysPositive;

        let plain = Screener::new(&market).screen(
            &["AAPL"],
            Timeframe::OneDay,
            30,
            &ScreenerCriteria::default(),
        );
        let boosted = Screener::new(&market).with_sentiment(&feed).screen(
            &["AAPL"],
            Timeframe::OneDay,
            30,
            &ScreenerCriteria::default(),
        );

        assert!((boosted[0].score - plain[0].score - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_computed_indicators_persisted_to_store() {
        let market = market_with("AAPL", series(30, -1.0, 1000.0));
        let cache = IndicatorCache::new();
        let screener = Screener::new(&market).with_store(&cache);

        screener.screen(
            &["AAPL"],
            Timeframe::OneDay,
            30,
            &ScreenerCriteria::default(),
        );
        assert_eq!(cache.len("AAPL", IndicatorKind::Rsi), 1);
        assert_eq!(cache.len("AAPL", IndicatorKind::Atr), 1);
    }

    #[test]
    fn test_stored_value_preferred_over_computed() {
        let bars = series(30, -1.0, 1000.0);
        let market = market_with("AAPL", bars.clone());
        let cache = IndicatorCache::new();
        // Stored RSI in the neutral band; the bar-derived value would be
        // deeply oversold
        cache
            .save_value("AAPL", IndicatorKind::Rsi, bars.last().unwrap().timestamp, 50.0)
            .unwrap();

        let screener = Screener::new(&market).with_store(&cache);
        let results = screener.screen(
            &["AAPL"],
            Timeframe::OneDay,
            30,
            &ScreenerCriteria::default(),
        );
        assert_eq!(results[0].rsi, Some(50.0));
        assert!(!results[0].signals.iter().any(|s| s.starts_with("RSI Oversold")));
    }

    #[test]
    fn test_short_series_yields_score_without_indicators() {
        // Too short for RSI/ATR but long enough to screen: kept because
        // the volume spike criterion fires
        let mut bars = series(5, -1.0, 1000.0);
        bars.last_mut().unwrap().volume = 3000.0;
        let market = market_with("AAPL", bars);
        let screener = Screener::new(&market);
        let results = screener.screen(
            &["AAPL"],
            Timeframe::OneDay,
            5,
            &ScreenerCriteria::default(),
        );
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].rsi, None);
        assert_eq!(results[0].atr, None);
        assert!(results[0].signals.iter().any(|s| s.starts_with("High Volume")));
    }

    #[test]
    fn test_zero_score_with_signals_retained() {
        // Overbought RSI (-10) exactly offsets elevated ATR (+10): the
        // net score is zero but signals fired, so the symbol stays in
        let market = market_with("AAPL", series(30, 0.5, 1000.0));
        let results = Screener::new(&market).screen(
            &["AAPL"],
            Timeframe::OneDay,
            30,
            &ScreenerCriteria::default(),
        );
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].score, 0.0);
        assert!(results[0].signals.iter().any(|s| s.starts_with("RSI Overbought")));
        assert!(results[0].signals.iter().any(|s| s.starts_with("High Volatility ATR")));
    }

    #[test]
    fn test_symbol_with_nothing_measurable_excluded() {
        // Flat two-bar series: no indicators, no criteria fire
        let mut bars = series(2, 0.0, 1000.0);
        for bar in &mut bars {
            bar.high = bar.open;
            bar.low = bar.open;
            bar.close = bar.open;
        }
        let market = market_with("AAPL", bars);
        let results = Screener::new(&market).screen(
            &["AAPL"],
            Timeframe::OneDay,
            2,
            &ScreenerCriteria::default(),
        );
        assert!(results.is_empty());
    }

    #[test]
    fn test_every_result_carries_final_summary() {
        let market = market_with("AAPL", series(30, 1.0, 1000.0));
        let results = Screener::new(&market).screen(
            &["AAPL"],
            Timeframe::OneDay,
            30,
            &ScreenerCriteria::default(),
        );
        assert!(results[0].signals.last().unwrap().starts_with("Final: "));
    }
}
