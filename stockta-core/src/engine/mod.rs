//! Indicator engine — batch enrichment of a `TimeSeries`.
//!
//! The engine is a pure transform: the configured indicators are computed
//! once over the full close column and attached by name. There is no
//! incremental mode; new data means re-enriching the whole series, which
//! replaces every output wholesale and is idempotent.

pub mod config;

pub use config::{IndicatorConfig, Periods};

use crate::domain::TimeSeries;
use crate::error::Result;
use crate::indicators::{Ema, Indicator, Macd, Rsi, Sma};
use rayon::prelude::*;

/// Computes the configured indicator set and attaches it to series.
pub struct IndicatorEngine {
    config: IndicatorConfig,
    indicators: Vec<Box<dyn Indicator>>,
}

impl IndicatorEngine {
    /// Build the indicator set for `config`.
    ///
    /// Fails with `InvalidParameter` for a zero period in any enabled
    /// indicator; nothing is computed in that case.
    pub fn new(config: IndicatorConfig) -> Result<Self> {
        config.validate()?;
        let p = &config.periods;

        let mut indicators: Vec<Box<dyn Indicator>> = vec![
            Box::new(Sma::new(p.sma_fast)?),
            Box::new(Sma::new(p.sma_slow)?),
        ];
        if config.include_ema {
            indicators.push(Box::new(Ema::new(p.ema)?));
        }
        if config.include_rsi {
            indicators.push(Box::new(Rsi::new(p.rsi)?));
        }
        if config.include_macd {
            indicators.push(Box::new(Macd::new(
                p.macd_fast,
                p.macd_slow,
                p.macd_signal,
            )?));
        }

        Ok(Self { config, indicators })
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    /// Every series name this engine attaches, in computation order.
    pub fn output_names(&self) -> Vec<String> {
        self.indicators
            .iter()
            .flat_map(|i| i.output_names())
            .collect()
    }

    /// Maximum lookback across the configured indicators.
    ///
    /// Bars before this index carry absent values or partially-seeded EMAs.
    pub fn warmup(&self) -> usize {
        self.indicators
            .iter()
            .map(|i| i.lookback())
            .max()
            .unwrap_or(0)
    }

    /// Compute every configured indicator and attach it to `series`.
    ///
    /// Indicators are attached one at a time in a fixed order and
    /// independently of each other: a failing indicator does not roll back
    /// the ones already attached, nor stop the ones after it. The first
    /// failure is returned once every indicator has been tried.
    ///
    /// The built-in indicators cannot fail once `new` has validated their
    /// periods; the error path covers any `Indicator` whose `compute` can.
    pub fn enrich(&self, series: &mut TimeSeries) -> Result<()> {
        let closes = series.closes();
        let mut first_error = None;

        for indicator in &self.indicators {
            let outcome = indicator
                .compute(&closes)
                .and_then(|outputs| outputs.into_iter().try_for_each(|o| series.attach(o)));
            if let Err(e) = outcome {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Builder-style variant of `enrich` that takes and returns the series.
    pub fn enriched(&self, mut series: TimeSeries) -> Result<TimeSeries> {
        self.enrich(&mut series)?;
        Ok(series)
    }

    /// Enrich several independent series in parallel.
    ///
    /// Each series is enriched sequentially on one worker; series share
    /// nothing but this engine's read-only indicator set.
    pub fn enrich_all(&self, series: &mut [TimeSeries]) -> Result<()> {
        series.par_iter_mut().try_for_each(|s| self.enrich(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DerivedSeries, TimeSeries};
    use crate::error::Error;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    /// Always fails, to exercise the error path of `enrich`.
    struct Failing;

    impl Indicator for Failing {
        fn name(&self) -> &str {
            "FAILING"
        }

        fn lookback(&self) -> usize {
            0
        }

        fn compute(&self, _closes: &[f64]) -> Result<Vec<DerivedSeries>> {
            Err(Error::Validation("cannot compute".into()))
        }
    }

    /// Emits one value too few, so `attach` rejects it.
    struct Short;

    impl Indicator for Short {
        fn name(&self) -> &str {
            "SHORT"
        }

        fn lookback(&self) -> usize {
            0
        }

        fn compute(&self, closes: &[f64]) -> Result<Vec<DerivedSeries>> {
            let values = closes.iter().skip(1).map(|&c| Some(c)).collect();
            Ok(vec![DerivedSeries::new("SHORT", values)])
        }
    }

    fn series(closes: &[f64]) -> TimeSeries {
        TimeSeries::new("TEST", make_bars(closes)).unwrap()
    }

    fn ramp(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64 * 0.5).collect()
    }

    #[test]
    fn baseline_attaches_both_smas_only() {
        let engine = IndicatorEngine::new(IndicatorConfig::default()).unwrap();
        let ts = engine.enriched(series(&ramp(60))).unwrap();
        assert_eq!(ts.series_names(), vec!["SMA_20", "SMA_50"]);
        assert_eq!(ts.series("SMA_20").unwrap().present_count(), 41);
        assert_eq!(ts.series("SMA_50").unwrap().present_count(), 11);
    }

    #[test]
    fn all_indicators_attached() {
        let engine = IndicatorEngine::new(IndicatorConfig::all()).unwrap();
        let ts = engine.enriched(series(&ramp(60))).unwrap();
        assert_eq!(
            ts.series_names(),
            vec!["EMA_20", "MACD", "MACD_Hist", "MACD_Signal", "RSI", "SMA_20", "SMA_50"]
        );
        // Strictly rising closes: no losses at all.
        assert_eq!(ts.value("RSI", 59), Some(100.0));
    }

    #[test]
    fn output_names_in_computation_order() {
        let engine = IndicatorEngine::new(IndicatorConfig::all()).unwrap();
        assert_eq!(
            engine.output_names(),
            vec!["SMA_20", "SMA_50", "EMA_20", "RSI", "MACD", "MACD_Signal", "MACD_Hist"]
        );
    }

    #[test]
    fn warmup_is_max_lookback() {
        let baseline = IndicatorEngine::new(IndicatorConfig::default()).unwrap();
        assert_eq!(baseline.warmup(), 49);
        let all = IndicatorEngine::new(IndicatorConfig::all()).unwrap();
        assert_eq!(all.warmup(), 49);

        let mut config = IndicatorConfig::all();
        config.periods.sma_slow = 10;
        assert_eq!(IndicatorEngine::new(config).unwrap().warmup(), 33);

        // RSI is present from bar period-1.
        let mut config = IndicatorConfig::default();
        config.include_rsi = true;
        config.periods.sma_fast = 5;
        config.periods.sma_slow = 10;
        assert_eq!(IndicatorEngine::new(config).unwrap().warmup(), 13);
    }

    #[test]
    fn custom_periods_rename_outputs() {
        let mut config = IndicatorConfig::default();
        config.include_ema = true;
        config.periods.sma_fast = 5;
        config.periods.sma_slow = 10;
        config.periods.ema = 8;
        let engine = IndicatorEngine::new(config).unwrap();
        let ts = engine.enriched(series(&ramp(12))).unwrap();
        assert_eq!(ts.series_names(), vec!["EMA_8", "SMA_10", "SMA_5"]);
        // SMA_5[4] = mean(100, 100.5, 101, 101.5, 102) = 101
        assert_approx(ts.value("SMA_5", 4).unwrap(), 101.0, DEFAULT_EPSILON);
    }

    #[test]
    fn invalid_period_aborts_before_attaching() {
        let mut config = IndicatorConfig::all();
        config.periods.rsi = 0;
        let err = IndicatorEngine::new(config).err().unwrap();
        assert!(matches!(err, Error::InvalidParameter { name: "periods.rsi", .. }));
    }

    #[test]
    fn failing_indicator_does_not_block_the_others() {
        let engine = IndicatorEngine {
            config: IndicatorConfig::default(),
            indicators: vec![
                Box::new(Sma::new(2).unwrap()),
                Box::new(Failing),
                Box::new(Short),
                Box::new(Sma::new(3).unwrap()),
            ],
        };
        let mut ts = series(&[1.0, 2.0, 3.0, 4.0]);
        let err = engine.enrich(&mut ts).unwrap_err();

        // First failure wins; the attach error from SHORT is dropped.
        match err {
            Error::Validation(msg) => assert_eq!(msg, "cannot compute"),
            other => panic!("unexpected error {other:?}"),
        }
        // Outputs before and after the failures are attached.
        assert_eq!(ts.series_names(), vec!["SMA_2", "SMA_3"]);
        assert_eq!(ts.value("SMA_3", 3), Some(3.0));
    }

    #[test]
    fn short_series_still_enriches() {
        let engine = IndicatorEngine::new(IndicatorConfig::all()).unwrap();
        let ts = engine.enriched(series(&[10.0, 11.0, 12.0])).unwrap();
        assert_eq!(ts.series("SMA_20").unwrap().present_count(), 0);
        assert_eq!(ts.series("EMA_20").unwrap().present_count(), 3);
        assert_eq!(ts.series("MACD").unwrap().present_count(), 3);
        assert_eq!(ts.series("RSI").unwrap().present_count(), 0);
    }

    #[test]
    fn empty_series_enriches_to_empty_columns() {
        let engine = IndicatorEngine::new(IndicatorConfig::all()).unwrap();
        let ts = engine.enriched(series(&[])).unwrap();
        assert!(ts.derived().all(|s| s.is_empty()));
        assert_eq!(ts.series_names().len(), 7);
    }

    #[test]
    fn re_enrich_replaces_and_is_idempotent() {
        let engine = IndicatorEngine::new(IndicatorConfig::all()).unwrap();
        let mut ts = series(&ramp(80));
        engine.enrich(&mut ts).unwrap();
        let first = ts.clone();
        engine.enrich(&mut ts).unwrap();
        assert_eq!(first, ts);
    }

    #[test]
    fn enrich_all_matches_sequential() {
        let engine = IndicatorEngine::new(IndicatorConfig::all()).unwrap();
        let inputs: Vec<TimeSeries> = (0..4)
            .map(|k| series(&(0..70).map(|i| 50.0 + ((i + k) as f64 * 0.2).sin()).collect::<Vec<_>>()))
            .collect();

        let mut parallel = inputs.clone();
        engine.enrich_all(&mut parallel).unwrap();

        for (input, par) in inputs.into_iter().zip(&parallel) {
            let sequential = engine.enriched(input).unwrap();
            assert_eq!(&sequential, par);
        }
    }
}
