//! Data provider trait and file-backed providers.
//!
//! The DataProvider trait abstracts over where bars come from (CSV exports,
//! saved Twelve Data responses) so the CLI can swap sources and tests can
//! point at a temp directory. Providers hand back bars sorted ascending by
//! date; validation happens in `TimeSeries::new`.

use crate::data::{csv_import, twelve_data};
use crate::domain::{PriceBar, TimeSeries};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Result of a successful load for a single symbol.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    pub bars: Vec<PriceBar>,
    pub source: DataSource,
}

impl FetchResult {
    /// Validate the bars into a `TimeSeries`.
    pub fn into_series(self) -> Result<TimeSeries> {
        let series = TimeSeries::new(self.symbol, self.bars)?;
        tracing::info!(
            symbol = series.symbol(),
            bars = series.len(),
            source = ?self.source,
            "loaded price series"
        );
        Ok(series)
    }
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    CsvImport,
    TwelveData,
}

/// Trait for data providers.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Load daily OHLCV bars for a symbol.
    fn load(&self, symbol: &str) -> Result<FetchResult>;
}

/// Directory of `<SYMBOL>.csv` files.
#[derive(Debug, Clone)]
pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }
}

impl DataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn load(&self, symbol: &str) -> Result<FetchResult> {
        let bars = csv_import::read_csv(&self.path_for(symbol))?;
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars,
            source: DataSource::CsvImport,
        })
    }
}

/// Directory of saved Twelve Data `time_series` responses, `<SYMBOL>.json`.
#[derive(Debug, Clone)]
pub struct TwelveDataFileProvider {
    dir: PathBuf,
}

impl TwelveDataFileProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DataProvider for TwelveDataFileProvider {
    fn name(&self) -> &str {
        "twelve-data"
    }

    fn load(&self, symbol: &str) -> Result<FetchResult> {
        let mut result = twelve_data::read_response(&self.dir.join(format!("{symbol}.json")))?;
        if result.symbol.is_empty() {
            result.symbol = symbol.to_string();
        }
        Ok(result)
    }
}

/// Load a single file, picking the reader by format.
pub fn load_file(path: &Path, format: FileFormat, symbol: Option<&str>) -> Result<FetchResult> {
    let mut result = match format {
        FileFormat::Csv => FetchResult {
            symbol: String::new(),
            bars: csv_import::read_csv(path)?,
            source: DataSource::CsvImport,
        },
        FileFormat::TwelveData => twelve_data::read_response(path)?,
    };

    if let Some(symbol) = symbol {
        result.symbol = symbol.to_string();
    } else if result.symbol.is_empty() {
        result.symbol = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_uppercase())
            .unwrap_or_default();
    }
    Ok(result)
}

/// On-disk formats understood by `load_file`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    TwelveData,
}

impl FileFormat {
    /// Guess from the file extension: `.json` is a saved Twelve Data response,
    /// anything else is CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => FileFormat::TwelveData,
            _ => FileFormat::Csv,
        }
    }
}
