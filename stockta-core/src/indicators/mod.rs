//! Windowed statistics and the indicators built on them.
//!
//! `sma` and `ema` are the only windowing primitives. RSI and MACD are
//! composed from them. Every indicator implements `Indicator`, which the
//! engine uses to compute and attach output series by name.

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use ema::{ema, Ema};
pub use macd::{macd, Macd, MacdLines, MACD, MACD_HIST, MACD_SIGNAL};
pub use rsi::{rsi, Rsi, RSI};
pub use sma::{sma, Sma};

use crate::domain::DerivedSeries;
use crate::error::Result;

/// Trait for indicators.
///
/// Indicators take the full closing-price column and produce one or more
/// named output series of the same length.
///
/// # Look-ahead contamination guard
/// No output value at bar t may depend on a close from bar t+1 or later.
/// Every indicator must pass the truncated-vs-full series test.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "SMA_20", "RSI").
    fn name(&self) -> &str;

    /// Number of bars of history before the output is fully warmed up.
    ///
    /// For SMA and RSI this is where values start being present. EMA-based
    /// indicators are present from bar 0 but still seeded on a partial window
    /// before this index.
    fn lookback(&self) -> usize;

    /// Names of the series `compute` returns, in order.
    fn output_names(&self) -> Vec<String> {
        vec![self.name().to_string()]
    }

    /// Compute every output series for the entire close column.
    fn compute(&self, closes: &[f64]) -> Result<Vec<DerivedSeries>>;
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::PriceBar> {
    use crate::domain::PriceBar;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            PriceBar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
