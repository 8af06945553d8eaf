//! Moving Average Convergence Divergence (MACD).
//!
//! MACD      = EMA(close, fast) - EMA(close, slow)
//! Signal    = EMA(MACD, signal)
//! Histogram = MACD - Signal
//!
//! All three lines are defined from bar 0 because EMA is seeded at the first
//! value. Early values are returned raw, not masked.

use crate::domain::DerivedSeries;
use crate::error::{Error, Result};
use crate::indicators::{ema, Indicator};

pub const MACD: &str = "MACD";
pub const MACD_SIGNAL: &str = "MACD_Signal";
pub const MACD_HIST: &str = "MACD_Hist";

/// The three MACD lines, index-aligned with the input.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdLines {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// Compute MACD, signal and histogram over `closes`.
pub fn macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> Result<MacdLines> {
    validate_periods(fast, slow, signal)?;

    let fast_ema = ema(closes, fast)?;
    let slow_ema = ema(closes, slow)?;
    let macd_line: Vec<f64> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| f - s)
        .collect();

    // Signal depends on the finished MACD line.
    let signal_line = ema(&macd_line, signal)?;
    let histogram = macd_line
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| m - s)
        .collect();

    Ok(MacdLines {
        macd: macd_line,
        signal: signal_line,
        histogram,
    })
}

fn validate_periods(fast: usize, slow: usize, signal: usize) -> Result<()> {
    if fast == 0 {
        return Err(Error::zero_period("macd.fast"));
    }
    if slow == 0 {
        return Err(Error::zero_period("macd.slow"));
    }
    if signal == 0 {
        return Err(Error::zero_period("macd.signal"));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Result<Self> {
        validate_periods(fast, slow, signal)?;
        Ok(Self { fast, slow, signal })
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        MACD
    }

    /// The slower EMA needs a full window, then the signal EMA needs its own
    /// window of MACD values.
    fn lookback(&self) -> usize {
        (self.fast.max(self.slow) - 1) + (self.signal - 1)
    }

    fn output_names(&self) -> Vec<String> {
        vec![MACD.into(), MACD_SIGNAL.into(), MACD_HIST.into()]
    }

    fn compute(&self, closes: &[f64]) -> Result<Vec<DerivedSeries>> {
        let lines = macd(closes, self.fast, self.slow, self.signal)?;
        Ok(vec![
            DerivedSeries::from_values(MACD, &lines.macd),
            DerivedSeries::from_values(MACD_SIGNAL, &lines.signal),
            DerivedSeries::from_values(MACD_HIST, &lines.histogram),
        ])
    }
}
