//! Relative Strength Index (RSI) indicator.

use crate::error::{EngineError, Result};

/// RSI zone classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsiZone {
    Oversold,
    Neutral,
    Overbought,
}

impl RsiZone {
    pub fn label(&self) -> &'static str {
        match self {
            RsiZone::Oversold => "oversold",
            RsiZone::Neutral => "neutral",
            RsiZone::Overbought => "overbought",
        }
    }
}

/// Calculate RSI over a chronologically ascending close series.
///
/// Returns one entry per input position. Positions before `period` have no
/// result (`None`), which is distinct from an RSI of 0. From `period`
/// onward the value is derived from simple averages of gains and losses
/// over the trailing `period` price changes. A window with zero average
/// loss yields RSI 100 (pure uptrend), never a division by zero.
pub fn rsi(closes: &[f64], period: usize) -> Result<Vec<Option<f64>>> {
    if closes.len() < period + 1 {
        return Err(EngineError::insufficient(period + 1, closes.len()));
    }

    let mut gains = vec![0.0; closes.len()];
    let mut losses = vec![0.0; closes.len()];

    for i in 1..closes.len() {
        let change = closes[i] - closes[i - 1];
        if change > 0.0 {
            gains[i] = change;
        } else {
            losses[i] = -change;
        }
    }

    let mut values = vec![None; closes.len()];
    for i in period..closes.len() {
        let window_gains = &gains[i - period + 1..=i];
        let window_losses = &losses[i - period + 1..=i];

        let avg_gain = average(window_gains);
        let avg_loss = average(window_losses);

        let value = if avg_loss == 0.0 {
            100.0
        } else {
            let rs = avg_gain / avg_loss;
            100.0 - (100.0 / (1.0 + rs))
        };
        values[i] = Some(value);
    }

    Ok(values)
}

/// Latest defined RSI value for a close series.
pub fn latest_rsi(closes: &[f64], period: usize) -> Result<f64> {
    let values = rsi(closes, period)?;
    values
        .iter()
        .rev()
        .find_map(|v| *v)
        .ok_or_else(|| EngineError::insufficient(period + 1, closes.len()))
}

/// Classify an RSI value into oversold / neutral / overbought.
pub fn classify_rsi(value: f64) -> RsiZone {
    if value < 30.0 {
        RsiZone::Oversold
    } else if value > 70.0 {
        RsiZone::Overbought
    } else {
        RsiZone::Neutral
    }
}

pub(crate) fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
