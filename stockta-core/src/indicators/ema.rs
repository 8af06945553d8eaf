//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * x[t] + (1 - alpha) * EMA[t-1], alpha = 2 / (period + 1).
//! Seed: EMA[0] = x[0], the first raw value (no SMA warm-up window).
//! Every index is defined; lookback still reports period - 1 as the point
//! where a full window of history has been absorbed.

use crate::domain::DerivedSeries;
use crate::error::{Error, Result};
use crate::indicators::Indicator;

/// EMA of `values` seeded at the first value. Output length equals input length.
pub fn ema(values: &[f64], period: usize) -> Result<Vec<f64>> {
    if period == 0 {
        return Err(Error::zero_period("ema.period"));
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut result = Vec::with_capacity(values.len());

    let mut iter = values.iter();
    if let Some(&seed) = iter.next() {
        result.push(seed);
        let mut prev = seed;
        for &v in iter {
            let next = alpha * v + (1.0 - alpha) * prev;
            result.push(next);
            prev = next;
        }
    }

    Ok(result)
}

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(Error::zero_period("ema.period"));
        }
        Ok(Self {
            period,
            name: format!("EMA_{period}"),
        })
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, closes: &[f64]) -> Result<Vec<DerivedSeries>> {
        let values = ema(closes, self.period)?;
        Ok(vec![DerivedSeries::from_values(self.name.clone(), &values)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn ema_5_known_values() {
        // alpha = 2/6
        // EMA[0] = 10
        // EMA[1] = 10 + (1/3)*(11-10) = 10.3333...
        // EMA[2] = (1/3)*12 + (2/3)*10.3333 = 10.8888...
        let closes = [
            10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0, 17.0, 18.0, 19.0, 20.0,
        ];
        let result = ema(&closes, 5).unwrap();

        assert_eq!(result.len(), closes.len());
        assert_eq!(result[0], 10.0);
        assert_approx(result[1], 10.0 + 1.0 / 3.0, DEFAULT_EPSILON);
        assert_approx(result[2], 98.0 / 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_period_1_equals_input() {
        let values = [100.0, 200.0, 300.0];
        let result = ema(&values, 1).unwrap();
        assert_eq!(result, values.to_vec());
    }

    #[test]
    fn ema_seed_is_first_value_exactly() {
        let values = [0.1 + 0.2, 5.0, 7.0];
        let result = ema(&values, 26).unwrap();
        assert_eq!(result[0], values[0]);
    }

    #[test]
    fn ema_constant_input_stays_constant() {
        let result = ema(&[42.0; 30], 9).unwrap();
        for v in result {
            assert_approx(v, 42.0, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn ema_empty_and_single() {
        assert!(ema(&[], 5).unwrap().is_empty());
        assert_eq!(ema(&[7.5], 5).unwrap(), vec![7.5]);
    }

    #[test]
    fn ema_zero_period_rejected() {
        assert!(matches!(
            ema(&[1.0], 0),
            Err(Error::InvalidParameter { .. })
        ));
        assert!(Ema::new(0).is_err());
    }

    #[test]
    fn ema_indicator_is_total() {
        let ind = Ema::new(20).unwrap();
        assert_eq!(ind.name(), "EMA_20");
        assert_eq!(ind.lookback(), 19);
        let out = ind.compute(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(out[0].present_count(), 3);
    }
}
