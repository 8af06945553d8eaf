//! StockTA Core — price series model and technical indicator engine.
//!
//! This crate contains:
//! - Domain types (price bars, time series, derived series with absent values)
//! - Windowed statistics (simple and exponential moving averages)
//! - Indicators composed from them (SMA, EMA, RSI, MACD)
//! - The indicator engine that enriches a series according to a config
//! - File importers for CSV exports and saved Twelve Data responses
//! - Content fingerprints for enriched series

pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod indicators;

pub use domain::{DerivedSeries, PriceBar, TimeSeries};
pub use engine::{IndicatorConfig, IndicatorEngine, Periods};
pub use error::{Error, Result};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: series and engine can cross thread boundaries.
    ///
    /// `IndicatorEngine::enrich_all` hands series to rayon workers; if any of
    /// these stops being Send + Sync the build breaks here first.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<PriceBar>();
        require_sync::<PriceBar>();
        require_send::<TimeSeries>();
        require_sync::<TimeSeries>();
        require_send::<DerivedSeries>();
        require_sync::<DerivedSeries>();
        require_send::<IndicatorEngine>();
        require_sync::<IndicatorEngine>();
        require_send::<IndicatorConfig>();
        require_sync::<IndicatorConfig>();
        require_send::<fingerprint::SeriesHash>();
        require_sync::<fingerprint::SeriesHash>();
    }

    /// Architecture contract: indicators see only the close column.
    ///
    /// `compute` takes `&[f64]`, not a `TimeSeries`, so an indicator cannot
    /// read another indicator's output or mutate the series it is attached to.
    #[test]
    fn indicator_trait_takes_closes_only() {
        fn _check_trait_object_builds(
            indicator: &dyn indicators::Indicator,
            closes: &[f64],
        ) -> Result<Vec<DerivedSeries>> {
            indicator.compute(closes)
        }
    }
}
