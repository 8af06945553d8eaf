//! Domain types: price bars and the series the engine reads and enriches.

pub mod bar;
pub mod series;

pub use bar::PriceBar;
pub use series::{DerivedSeries, TimeSeries, CLOSE};
