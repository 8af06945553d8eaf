//! CSV import of daily bars.
//!
//! Expected header: `date,open,high,low,close,volume` with ISO dates
//! (`datetime` is accepted as an alias for `date`). Rows must already be in
//! ascending date order.
//!
//! Only `close` is required. A blank or non-numeric close is a validation
//! error naming the row; blank open/high/low become NaN and a blank volume
//! becomes 0, since the engine never reads them.

use crate::domain::PriceBar;
use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "datetime")]
    date: NaiveDate,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    open: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    high: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    low: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    close: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    volume: Option<f64>,
}

/// Read bars from a CSV file.
pub fn read_csv(path: &Path) -> Result<Vec<PriceBar>> {
    let file = File::open(path)?;
    let bars = parse_csv(file)?;
    tracing::debug!(path = %path.display(), rows = bars.len(), "read CSV bars");
    Ok(bars)
}

/// Read bars from any CSV source.
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<PriceBar>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut bars = Vec::new();
    for (i, row) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = row?;
        let close = row.close.ok_or_else(|| {
            Error::Validation(format!(
                "row {} ({}): close is missing or not a number",
                i + 1,
                row.date
            ))
        })?;
        bars.push(PriceBar {
            date: row.date,
            open: row.open.unwrap_or(f64::NAN),
            high: row.high.unwrap_or(f64::NAN),
            low: row.low.unwrap_or(f64::NAN),
            close,
            volume: row.volume.unwrap_or(0.0),
        });
    }
    Ok(bars)
}
