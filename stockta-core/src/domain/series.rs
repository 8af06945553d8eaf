//! TimeSeries and DerivedSeries — the engine's input and output containers.
//!
//! A `TimeSeries` owns its bars and every derived column attached to it.
//! Derived columns are index-aligned with the bars; an absent value is `None`,
//! never a NaN.

use crate::domain::PriceBar;
use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the closing-price column as exposed to presentation code.
pub const CLOSE: &str = "close";

/// A named sequence of optional values, index-aligned with a `TimeSeries`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedSeries {
    name: String,
    values: Vec<Option<f64>>,
}

impl DerivedSeries {
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Build a fully-present series from raw values.
    ///
    /// Non-finite inputs still become `None` so that NaN/inf can never reach
    /// a consumer through this type.
    pub fn from_values(name: impl Into<String>, values: &[f64]) -> Self {
        Self::new(name, values.iter().map(|&v| finite(v)).collect())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of present (defined) points.
    pub fn present_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

/// Map a float to `Some` only when it is finite.
pub(crate) fn finite(v: f64) -> Option<f64> {
    if v.is_finite() {
        Some(v)
    } else {
        None
    }
}

/// Ordered daily bars for one instrument plus attached derived columns.
///
/// Serializable for presentation output; construction always goes through
/// `TimeSeries::new` so the ordering invariant holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    symbol: String,
    bars: Vec<PriceBar>,
    derived: BTreeMap<String, DerivedSeries>,
}

impl TimeSeries {
    /// Validate and take ownership of `bars`.
    ///
    /// Dates must be strictly increasing and every close finite. An empty
    /// series is valid.
    pub fn new(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Result<Self> {
        for (i, bar) in bars.iter().enumerate() {
            if !bar.close.is_finite() {
                return Err(Error::Validation(format!(
                    "bar {i} ({}) has non-numeric close {}",
                    bar.date, bar.close
                )));
            }
            if i > 0 && bar.date <= bars[i - 1].date {
                return Err(Error::Validation(format!(
                    "dates not strictly increasing at bar {i}: {} follows {}",
                    bar.date,
                    bars[i - 1].date
                )));
            }
        }

        Ok(Self {
            symbol: symbol.into(),
            bars,
            derived: BTreeMap::new(),
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bar(&self, index: usize) -> Option<&PriceBar> {
        self.bars.get(index)
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    /// The closing-price column.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// The closing-price column as a derived-compatible series named `close`.
    pub fn close_series(&self) -> DerivedSeries {
        DerivedSeries::from_values(CLOSE, &self.closes())
    }

    /// Attach a derived series, replacing any prior series with the same name.
    pub fn attach(&mut self, series: DerivedSeries) -> Result<()> {
        if series.len() != self.bars.len() {
            return Err(Error::Validation(format!(
                "series '{}' has {} values for {} bars",
                series.name(),
                series.len(),
                self.bars.len()
            )));
        }
        self.derived.insert(series.name().to_string(), series);
        Ok(())
    }

    /// Look up a derived series by name. `close` resolves to nothing here;
    /// use `close_series()` for the price column.
    pub fn series(&self, name: &str) -> Option<&DerivedSeries> {
        self.derived.get(name)
    }

    /// Value of a named column at `index`. Accepts `close` as well as any
    /// attached series. `None` for absent points, unknown names or out of range.
    pub fn value(&self, name: &str, index: usize) -> Option<f64> {
        if name == CLOSE {
            return self.bars.get(index).map(|b| b.close);
        }
        self.derived.get(name).and_then(|s| s.get(index))
    }

    /// Names of attached derived series, sorted.
    pub fn series_names(&self) -> Vec<&str> {
        self.derived.keys().map(|k| k.as_str()).collect()
    }

    pub fn derived(&self) -> impl Iterator<Item = &DerivedSeries> {
        self.derived.values()
    }

    /// Drop every attached series, keeping the bars.
    pub fn clear_derived(&mut self) {
        self.derived.clear();
    }

    /// Bars whose date falls in `[start, end]`, as a fresh series with no
    /// derived columns.
    pub fn slice_dates(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(Error::Validation(format!(
                    "start date {s} is after end date {e}"
                )));
            }
        }
        let bars = self
            .bars
            .iter()
            .filter(|b| start.map_or(true, |s| b.date >= s) && end.map_or(true, |e| b.date <= e))
            .cloned()
            .collect();
        Self::new(self.symbol.clone(), bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn new_accepts_increasing_dates() {
        let ts = TimeSeries::new("TEST", make_bars(&[1.0, 2.0, 3.0])).unwrap();
        assert_eq!(ts.len(), 3);
        assert_eq!(ts.closes(), vec![1.0, 2.0, 3.0]);
        assert_eq!(ts.bar(1).unwrap().close, 2.0);
        assert!(ts.bar(3).is_none());
    }

    #[test]
    fn new_accepts_empty() {
        let ts = TimeSeries::new("TEST", vec![]).unwrap();
        assert!(ts.is_empty());
        assert_eq!(ts.first_date(), None);
    }

    #[test]
    fn new_rejects_duplicate_dates() {
        let mut bars = make_bars(&[1.0, 2.0, 3.0]);
        bars[2].date = bars[1].date;
        let err = TimeSeries::new("TEST", bars).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn new_rejects_out_of_order_dates() {
        let mut bars = make_bars(&[1.0, 2.0, 3.0]);
        bars.swap(0, 2);
        assert!(matches!(
            TimeSeries::new("TEST", bars),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn new_rejects_non_numeric_close() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut bars = make_bars(&[1.0, 2.0, 3.0]);
            bars[1].close = bad;
            assert!(matches!(
                TimeSeries::new("TEST", bars),
                Err(Error::Validation(_))
            ));
        }
    }

    #[test]
    fn attach_overwrites_same_name() {
        let mut ts = TimeSeries::new("TEST", make_bars(&[1.0, 2.0])).unwrap();
        ts.attach(DerivedSeries::new("X", vec![None, Some(1.0)]))
            .unwrap();
        ts.attach(DerivedSeries::new("X", vec![Some(5.0), Some(6.0)]))
            .unwrap();
        assert_eq!(ts.series_names(), vec!["X"]);
        assert_eq!(ts.value("X", 0), Some(5.0));
    }

    #[test]
    fn attach_rejects_length_mismatch() {
        let mut ts = TimeSeries::new("TEST", make_bars(&[1.0, 2.0])).unwrap();
        let err = ts.attach(DerivedSeries::new("X", vec![Some(1.0)]));
        assert!(matches!(err, Err(Error::Validation(_))));
        assert!(ts.series("X").is_none());
    }

    #[test]
    fn value_distinguishes_absent_from_zero() {
        let mut ts = TimeSeries::new("TEST", make_bars(&[1.0, 2.0])).unwrap();
        ts.attach(DerivedSeries::new("X", vec![None, Some(0.0)]))
            .unwrap();
        assert_eq!(ts.value("X", 0), None);
        assert_eq!(ts.value("X", 1), Some(0.0));
        assert_eq!(ts.value(CLOSE, 1), Some(2.0));
        assert_eq!(ts.value("missing", 0), None);
    }

    #[test]
    fn from_values_masks_non_finite() {
        let s = DerivedSeries::from_values("X", &[1.0, f64::NAN, f64::INFINITY]);
        assert_eq!(s.values(), &[Some(1.0), None, None]);
        assert_eq!(s.present_count(), 1);
    }

    #[test]
    fn slice_dates_filters_inclusive() {
        let ts = TimeSeries::new("TEST", make_bars(&[1.0, 2.0, 3.0, 4.0, 5.0])).unwrap();
        let start = ts.bar(1).unwrap().date;
        let end = ts.bar(3).unwrap().date;
        let sliced = ts.slice_dates(Some(start), Some(end)).unwrap();
        assert_eq!(sliced.closes(), vec![2.0, 3.0, 4.0]);
        assert_eq!(sliced.symbol(), "TEST");

        let open_ended = ts.slice_dates(Some(end), None).unwrap();
        assert_eq!(open_ended.closes(), vec![4.0, 5.0]);
    }

    #[test]
    fn slice_dates_rejects_inverted_range() {
        let ts = TimeSeries::new("TEST", make_bars(&[1.0, 2.0])).unwrap();
        let d0 = ts.bar(0).unwrap().date;
        let d1 = ts.bar(1).unwrap().date;
        assert!(ts.slice_dates(Some(d1), Some(d0)).is_err());
    }
}
