//! Saved Twelve Data `time_series` responses.
//!
//! The API returns newest-first values with every number encoded as a
//! string. An error response carries `status: "error"` and a `message`
//! instead of `values`. Reading is purely offline: the response has already
//! been fetched and written to disk by something else.

use crate::data::provider::{DataSource, FetchResult};
use crate::domain::PriceBar;
use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct Response {
    meta: Option<Meta>,
    values: Option<Vec<Value>>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Meta {
    symbol: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Value {
    datetime: String,
    open: Option<String>,
    high: Option<String>,
    low: Option<String>,
    close: Option<String>,
    volume: Option<String>,
}

/// Read a saved response from disk.
pub fn read_response(path: &Path) -> Result<FetchResult> {
    let content = std::fs::read_to_string(path)?;
    parse_response(&content)
}

/// Parse a response body into bars sorted ascending by date.
pub fn parse_response(json: &str) -> Result<FetchResult> {
    let response: Response = serde_json::from_str(json)?;

    let Some(values) = response.values else {
        let message = response
            .message
            .unwrap_or_else(|| "Unknown error".to_string());
        tracing::warn!(%message, "time series response has no values");
        return Err(Error::Provider(message));
    };

    let mut bars = values
        .into_iter()
        .map(to_bar)
        .collect::<Result<Vec<_>>>()?;
    bars.sort_by_key(|b| b.date);

    let symbol = response
        .meta
        .and_then(|m| m.symbol)
        .unwrap_or_default();

    Ok(FetchResult {
        symbol,
        bars,
        source: DataSource::TwelveData,
    })
}

fn to_bar(value: Value) -> Result<PriceBar> {
    // Daily bars come as "YYYY-MM-DD"; intraday stamps carry a time suffix.
    let date_part = value.datetime.get(..10).unwrap_or(&value.datetime);
    let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|e| {
        Error::Validation(format!("bad datetime '{}': {e}", value.datetime))
    })?;

    let close = parse_number(value.close.as_deref()).ok_or_else(|| {
        Error::Validation(format!("{date}: close is missing or not a number"))
    })?;

    Ok(PriceBar {
        date,
        open: parse_number(value.open.as_deref()).unwrap_or(f64::NAN),
        high: parse_number(value.high.as_deref()).unwrap_or(f64::NAN),
        low: parse_number(value.low.as_deref()).unwrap_or(f64::NAN),
        close,
        volume: parse_number(value.volume.as_deref()).unwrap_or(0.0),
    })
}

fn parse_number(raw: Option<&str>) -> Option<f64> {
    raw?.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
