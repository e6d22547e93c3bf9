//! Core services: indicator calculators, anomaly detection, signal
//! synthesis, and the screening pipeline.

pub mod cache;
pub mod indicators;
pub mod interest;
pub mod providers;
pub mod screener;
pub mod setups;
pub mod synthesizer;
pub mod whale;

pub use cache::IndicatorCache;
pub use providers::{IndicatorKind, IndicatorStore, MarketData, Sentiment, SentimentFeed};
pub use screener::Screener;
