//! Volume Weighted Average Price (VWAP) indicator.

use crate::types::Bar;
use serde::{Deserialize, Serialize};

/// Current close relative to VWAP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VwapTrend {
    Above,
    Below,
    At,
}

impl VwapTrend {
    pub fn label(&self) -> &'static str {
        match self {
            VwapTrend::Above => "ABOVE (Bullish)",
            VwapTrend::Below => "BELOW (Bearish)",
            VwapTrend::At => "AT VWAP (Neutral)",
        }
    }
}

/// Direction of a detected VWAP bounce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BounceType {
    Bullish,
    Bearish,
}

/// Fixed-shape VWAP analysis result. Field presence and types are
/// statically known; no freeform payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VwapAnalysis {
    pub vwap: f64,
    pub current_price: f64,
    pub trend: VwapTrend,
    pub distance_pct: f64,
    pub is_bounce: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounce_type: Option<BounceType>,
    pub is_support: bool,
    pub is_resistance: bool,
    pub bars_processed: usize,
}

/// Computes Volume Weighted Average Price over a borrowed,
/// chronologically ascending bar series.
pub struct VwapCalculator<'a> {
    bars: &'a [Bar],
}

impl<'a> VwapCalculator<'a> {
    pub fn new(bars: &'a [Bar]) -> Self {
        Self { bars }
    }

    /// VWAP over the full series. Returns 0.0 for an empty series or when
    /// the summed volume is 0.
    pub fn calculate(&self) -> f64 {
        if self.bars.is_empty() {
            return 0.0;
        }
        self.calculate_at(self.bars.len() - 1)
    }

    /// Cumulative VWAP from the start of the series through `index`.
    pub fn calculate_at(&self, index: usize) -> f64 {
        if index >= self.bars.len() {
            return 0.0;
        }
        self.weighted_average(0, index)
    }

    /// VWAP over an inclusive index range.
    pub fn calculate_range(&self, start: usize, end: usize) -> f64 {
        if start > end || end >= self.bars.len() {
            return 0.0;
        }
        self.weighted_average(start, end)
    }

    /// Cumulative VWAP value at every bar position.
    pub fn all_values(&self) -> Vec<f64> {
        (0..self.bars.len()).map(|i| self.calculate_at(i)).collect()
    }

    /// Whether the latest close sits above, below, or at VWAP.
    pub fn trend(&self) -> VwapTrend {
        let current = match self.bars.last() {
            Some(bar) => bar.close,
            None => return VwapTrend::At,
        };
        let vwap = self.calculate();

        if current > vwap {
            VwapTrend::Above
        } else if current < vwap {
            VwapTrend::Below
        } else {
            VwapTrend::At
        }
    }

    /// Percentage distance from the latest close to VWAP. 0.0 when VWAP
    /// itself is 0 (empty or zero-volume series).
    pub fn distance_pct(&self) -> f64 {
        let current = match self.bars.last() {
            Some(bar) => bar.close,
            None => return 0.0,
        };
        let vwap = self.calculate();
        if vwap == 0.0 {
            return 0.0;
        }
        ((current - vwap) / vwap) * 100.0
    }

    /// Price crossed down to VWAP from above, within `tolerance` percent.
    pub fn is_support(&self, tolerance: f64) -> bool {
        if self.bars.len() < 2 {
            return false;
        }
        let current = self.bars[self.bars.len() - 1].close;
        let previous = self.bars[self.bars.len() - 2].close;
        let vwap = self.calculate();

        previous >= vwap && current <= vwap * (1.0 + tolerance / 100.0)
    }

    /// Price crossed up to VWAP from below, within `tolerance` percent.
    pub fn is_resistance(&self, tolerance: f64) -> bool {
        if self.bars.len() < 2 {
            return false;
        }
        let current = self.bars[self.bars.len() - 1].close;
        let previous = self.bars[self.bars.len() - 2].close;
        let vwap = self.calculate();

        previous <= vwap && current >= vwap * (1.0 - tolerance / 100.0)
    }

    /// Detect whether the last three closes approached VWAP and reversed.
    ///
    /// Bullish bounce: two bars back below VWAP, previous bar within
    /// tolerance of VWAP, current bar back above. Bearish is the mirror.
    pub fn bounce(&self, tolerance: f64) -> Option<BounceType> {
        if self.bars.len() < 3 {
            return None;
        }

        let current = self.bars[self.bars.len() - 1].close;
        let previous = self.bars[self.bars.len() - 2].close;
        let two_back = self.bars[self.bars.len() - 3].close;
        let vwap = self.calculate();

        if two_back < vwap && previous <= vwap * (1.0 + tolerance / 100.0) && current > vwap {
            return Some(BounceType::Bullish);
        }

        if two_back > vwap && previous >= vwap * (1.0 - tolerance / 100.0) && current < vwap {
            return Some(BounceType::Bearish);
        }

        None
    }

    /// Full VWAP analysis for the series.
    pub fn analyze(&self, tolerance: f64) -> VwapAnalysis {
        let bounce = self.bounce(tolerance);
        VwapAnalysis {
            vwap: self.calculate(),
            current_price: self.bars.last().map(|b| b.close).unwrap_or(0.0),
            trend: self.trend(),
            distance_pct: self.distance_pct(),
            is_bounce: bounce.is_some(),
            bounce_type: bounce,
            is_support: self.is_support(tolerance),
            is_resistance: self.is_resistance(tolerance),
            bars_processed: self.bars.len(),
        }
    }

    fn weighted_average(&self, start: usize, end: usize) -> f64 {
        let mut weighted = 0.0;
        let mut volume = 0.0;

        for bar in &self.bars[start..=end] {
            weighted += bar.typical_price() * bar.volume;
            volume += bar.volume;
        }

        if volume == 0.0 {
            return 0.0;
        }
        weighted / volume
    }
}
