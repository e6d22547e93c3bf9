//! Technical indicator implementations.
//!
//! Every calculator is a pure function over a chronologically ascending
//! bar series; "not enough history yet" is reported as `None`, never as
//! an error or a zero.

pub mod atr;
pub mod candle;
pub mod levels;
pub mod rsi;
pub mod vwap;

pub use atr::{atr, atr_from_bars, categorize_atr, latest_atr, true_range, AtrCategory};
pub use candle::{
    classify, classify_with_context, measure, recent_trend, CandleMetrics, CandlePattern,
    CandleTrend, ContextPattern,
};
pub use levels::{
    distance_to_resistance, distance_to_support, find_resistance, find_support,
    is_at_resistance, is_at_support, is_breakout_above, is_breakout_below,
    local_resistance_levels, local_support_levels, pivot_point,
};
pub use rsi::{classify_rsi, latest_rsi, rsi, RsiZone};
pub use vwap::{BounceType, VwapAnalysis, VwapCalculator, VwapTrend};
