//! Bar import from files: CSV exports and saved Twelve Data responses.

pub mod csv_import;
pub mod provider;
pub mod twelve_data;

pub use provider::{
    load_file, CsvProvider, DataProvider, DataSource, FetchResult, FileFormat,
    TwelveDataFileProvider,
};
