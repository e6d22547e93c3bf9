//! In-memory indicator cache.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::collections::BTreeMap;

use crate::error::Result;
use crate::services::providers::{IndicatorKind, IndicatorStore};

/// Thread-safe in-memory implementation of `IndicatorStore`.
///
/// Values are held per symbol and indicator kind in timestamp order.
/// Suitable as a process-local cache in front of (or in place of) a
/// durable store.
#[derive(Default)]
pub struct IndicatorCache {
    /// Key format: "{symbol}:{kind}"
    data: DashMap<String, BTreeMap<DateTime<Utc>, f64>>,
}

impl IndicatorCache {
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
        }
    }

    fn key(symbol: &str, kind: IndicatorKind) -> String {
        format!("{}:{}", symbol.to_uppercase(), kind.label())
    }

    /// Number of stored values for a symbol/kind pair.
    pub fn len(&self, symbol: &str, kind: IndicatorKind) -> usize {
        self.data
            .get(&Self::key(symbol, kind))
            .map(|series| series.len())
            .unwrap_or(0)
    }

    /// Remove every stored value.
    pub fn clear(&self) {
        self.data.clear();
    }
}

impl IndicatorStore for IndicatorCache {
    fn fetch_series(
        &self,
        symbol: &str,
        kind: IndicatorKind,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<BTreeMap<DateTime<Utc>, f64>> {
        let series = match self.data.get(&Self::key(symbol, kind)) {
            Some(series) => series,
            None => return Ok(BTreeMap::new()),
        };
        Ok(series
            .range(start..=end)
            .map(|(ts, value)| (*ts, *value))
            .collect())
    }

    fn save_value(
        &self,
        symbol: &str,
        kind: IndicatorKind,
        timestamp: DateTime<Utc>,
        value: f64,
    ) -> Result<()> {
        self.data
            .entry(Self::key(symbol, kind))
            .or_default()
            .insert(timestamp, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_save_and_fetch() {
        let cache = IndicatorCache::new();
        cache.save_value("AAPL", IndicatorKind::Rsi, ts(100), 45.0).unwrap();
        cache.save_value("AAPL", IndicatorKind::Rsi, ts(200), 50.0).unwrap();
        cache.save_value("AAPL", IndicatorKind::Atr, ts(100), 2.5).unwrap();

        let series = cache
            .fetch_series("AAPL", IndicatorKind::Rsi, ts(0), ts(300))
            .unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[&ts(200)], 50.0);
    }

    #[test]
    fn test_fetch_respects_range() {
        let cache = IndicatorCache::new();
        for i in 0..5 {
            cache
                .save_value("MSFT", IndicatorKind::Atr, ts(i * 100), i as f64)
                .unwrap();
        }
        let series = cache
            .fetch_series("MSFT", IndicatorKind::Atr, ts(100), ts(300))
            .unwrap();
        assert_eq!(series.len(), 3);
        assert!(!series.contains_key(&ts(0)));
        assert!(!series.contains_key(&ts(400)));
    }

    #[test]
    fn test_missing_symbol_is_empty_not_error() {
        let cache = IndicatorCache::new();
        let series = cache
            .fetch_series("ZZZZ", IndicatorKind::Rsi, ts(0), ts(1000))
            .unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_symbol_case_insensitive() {
        let cache = IndicatorCache::new();
        cache.save_value("aapl", IndicatorKind::Rsi, ts(100), 45.0).unwrap();
        assert_eq!(cache.len("AAPL", IndicatorKind::Rsi), 1);
    }
}
