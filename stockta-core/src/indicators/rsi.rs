//! Relative Strength Index (RSI).
//!
//! Average gain and average loss are plain rolling means (SMA) of the
//! per-bar gains and losses, not Wilder-smoothed.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Bar 0 has no prior close and counts as zero gain and zero loss, so the
//! first full window ends at bar period-1.
//! Lookback: period - 1.
//! Edge cases: avg_loss == 0 < avg_gain → 100; avg_gain == avg_loss == 0 → absent.

use crate::domain::DerivedSeries;
use crate::error::{Error, Result};
use crate::indicators::{sma, Indicator};

/// Output series name.
pub const RSI: &str = "RSI";

/// RSI of `closes` over `period` bars. Indices below `period - 1` are absent.
pub fn rsi(closes: &[f64], period: usize) -> Result<Vec<Option<f64>>> {
    if period == 0 {
        return Err(Error::zero_period("rsi.period"));
    }

    if closes.is_empty() {
        return Ok(Vec::new());
    }

    // gains[i] and losses[i] come from close[i] - close[i-1]; bar 0 is zero.
    let (mut gains, mut losses) = (vec![0.0], vec![0.0]);
    for w in closes.windows(2) {
        let delta = w[1] - w[0];
        gains.push(delta.max(0.0));
        losses.push((-delta).max(0.0));
    }

    let avg_gains = sma(&gains, period)?;
    let avg_losses = sma(&losses, period)?;

    Ok(avg_gains
        .iter()
        .zip(&avg_losses)
        .map(|(gain, loss)| match (gain, loss) {
            (Some(gain), Some(loss)) => rsi_point(*gain, *loss),
            _ => None,
        })
        .collect())
}

/// One RSI value from average gain and loss.
///
/// Division by a zero loss is left to IEEE semantics: +inf collapses to 100,
/// and 0/0 yields NaN, which is reported as absent.
fn rsi_point(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    // Means of non-negative values; clamp rolling-sum residue below zero.
    let rs = avg_gain.max(0.0) / avg_loss.max(0.0);
    let value = 100.0 - 100.0 / (1.0 + rs);
    if value.is_nan() {
        None
    } else {
        Some(value)
    }
}

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(Error::zero_period("rsi.period"));
        }
        Ok(Self { period })
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        RSI
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, closes: &[f64]) -> Result<Vec<DerivedSeries>> {
        Ok(vec![DerivedSeries::new(RSI, rsi(closes, self.period)?)])
    }
}
