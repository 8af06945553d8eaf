//! Simple Moving Average (SMA).
//!
//! Rolling mean over a trailing window.
//! Lookback: period - 1 (first present value at index period-1).
//! Fewer than `period` points is not an error: every value is absent.

use crate::domain::series::finite;
use crate::domain::DerivedSeries;
use crate::error::{Error, Result};
use crate::indicators::Indicator;

/// Rolling mean of `values` over `period` points.
///
/// Output is index-aligned with the input; indices below `period - 1` are
/// `None`.
pub fn sma(values: &[f64], period: usize) -> Result<Vec<Option<f64>>> {
    if period == 0 {
        return Err(Error::zero_period("sma.period"));
    }

    let n = values.len();
    let mut result = vec![None; n];
    if n < period {
        return Ok(result);
    }

    let divisor = period as f64;

    // Count of nonzero values in the window. A window of exact zeros reports
    // an exact 0.0 mean regardless of rounding residue left in `sum`.
    let mut nonzero = 0usize;
    let mut sum = 0.0;
    for &v in &values[..period] {
        sum += v;
        if v != 0.0 {
            nonzero += 1;
        }
    }
    result[period - 1] = window_mean(sum, nonzero, divisor);

    for i in period..n {
        let leaving = values[i - period];
        let entering = values[i];
        sum = sum - leaving + entering;
        if leaving != 0.0 {
            nonzero -= 1;
        }
        if entering != 0.0 {
            nonzero += 1;
        }
        result[i] = window_mean(sum, nonzero, divisor);
    }

    Ok(result)
}

fn window_mean(sum: f64, nonzero: usize, divisor: f64) -> Option<f64> {
    if nonzero == 0 {
        Some(0.0)
    } else {
        finite(sum / divisor)
    }
}

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(Error::zero_period("sma.period"));
        }
        Ok(Self {
            period,
            name: format!("SMA_{period}"),
        })
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, closes: &[f64]) -> Result<Vec<DerivedSeries>> {
        Ok(vec![DerivedSeries::new(
            self.name.clone(),
            sma(closes, self.period)?,
        )])
    }
}
