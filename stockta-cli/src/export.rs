//! CSV export of an enriched series: `date,close,<columns...>`.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use stockta_core::domain::CLOSE;
use stockta_core::TimeSeries;

/// Write `series` to `path`. Absent values become empty cells.
pub fn export_csv(series: &TimeSeries, columns: &[String], path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("create export file {}", path.display()))?;
    write_csv(series, columns, file)?;
    tracing::info!(path = %path.display(), rows = series.len(), "exported series");
    Ok(())
}

pub fn write_csv<W: Write>(series: &TimeSeries, columns: &[String], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["date", CLOSE];
    header.extend(columns.iter().map(String::as_str));
    wtr.write_record(&header)?;

    for (i, bar) in series.bars().iter().enumerate() {
        let mut record = vec![bar.date.to_string(), bar.close.to_string()];
        record.extend(
            columns
                .iter()
                .map(|name| series.value(name, i).map(|v| v.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
