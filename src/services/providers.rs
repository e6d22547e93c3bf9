//! Collaborator interfaces consumed by the screening pipeline.
//!
//! The engine owns no I/O: market data, indicator persistence, and news
//! sentiment are supplied by the caller through these traits and are
//! treated as fallible operations with explicit error results. Retry and
//! backoff policy belongs to the implementations, not the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;
use crate::types::{Bar, Timeframe};

/// Kind of indicator value held by an `IndicatorStore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    Rsi,
    Atr,
}

impl IndicatorKind {
    pub fn label(&self) -> &'static str {
        match self {
            IndicatorKind::Rsi => "rsi",
            IndicatorKind::Atr => "atr",
        }
    }
}

/// Sentiment classification supplied by an optional news collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

/// Market-data provider. Implementations must return bars in
/// chronologically ascending order (oldest first) and apply their own
/// retry/backoff before surfacing an error.
pub trait MarketData {
    fn fetch_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
        start: Option<DateTime<Utc>>,
    ) -> Result<Vec<Bar>>;
}

/// Persistence for previously computed indicator values, keyed by
/// timestamp. The engine's calculators work with or without this cache.
pub trait IndicatorStore {
    /// Fetch stored values within an inclusive time range.
    fn fetch_series(
        &self,
        symbol: &str,
        kind: IndicatorKind,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<BTreeMap<DateTime<Utc>, f64>>;

    /// Persist one indicator value.
    fn save_value(
        &self,
        symbol: &str,
        kind: IndicatorKind,
        timestamp: DateTime<Utc>,
        value: f64,
    ) -> Result<()>;
}

/// Optional news/sentiment collaborator. The screener functions
/// identically when no feed is configured.
pub trait SentimentFeed {
    fn latest_sentiment(&self, symbol: &str) -> Result<Option<Sentiment>>;
}
