//! Stockta CLI — load daily bars, compute indicators, summarize and export.
//!
//! Commands:
//! - `analyze` — load a CSV or saved Twelve Data response, enrich it with the
//!   selected indicators, print a summary and optionally export CSV
//! - `indicators` — list the available indicators and their default periods

mod export;
mod summary;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Instant;
use stockta_core::data::{load_file, FileFormat};
use stockta_core::fingerprint::series_hash;
use stockta_core::{IndicatorConfig, IndicatorEngine, Periods};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "stockta",
    about = "Stockta CLI — technical indicators over daily price series"
)]
struct Cli {
    /// Append logs to this file instead of stderr.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute indicators for one price file and print a summary.
    Analyze {
        /// CSV file or saved Twelve Data JSON response.
        #[arg(long)]
        input: PathBuf,

        /// Input format. Guessed from the file extension when omitted.
        #[arg(long, value_enum)]
        format: Option<InputFormat>,

        /// Symbol label. Defaults to the response metadata or the file name.
        #[arg(long)]
        symbol: Option<String>,

        /// First date to keep (YYYY-MM-DD).
        #[arg(long)]
        start: Option<String>,

        /// Last date to keep (YYYY-MM-DD).
        #[arg(long)]
        end: Option<String>,

        /// Include the EMA line.
        #[arg(long, default_value_t = false)]
        ema: bool,

        /// Include RSI.
        #[arg(long, default_value_t = false)]
        rsi: bool,

        /// Include MACD, its signal line and histogram.
        #[arg(long, default_value_t = false)]
        macd: bool,

        /// TOML indicator config. Flags above switch indicators on in addition.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the enriched series to this CSV file.
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// List available indicators and their default periods.
    Indicators,
}

#[derive(Clone, Copy, ValueEnum)]
enum InputFormat {
    Csv,
    TwelveData,
}

impl From<InputFormat> for FileFormat {
    fn from(format: InputFormat) -> Self {
        match format {
            InputFormat::Csv => FileFormat::Csv,
            InputFormat::TwelveData => FileFormat::TwelveData,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    match cli.command {
        Commands::Analyze {
            input,
            format,
            symbol,
            start,
            end,
            ema,
            rsi,
            macd,
            config,
            export,
        } => {
            let mut indicator_config = match config {
                Some(path) => IndicatorConfig::from_file(&path)
                    .with_context(|| format!("load config {}", path.display()))?,
                None => IndicatorConfig::default(),
            };
            indicator_config.include_ema |= ema;
            indicator_config.include_rsi |= rsi;
            indicator_config.include_macd |= macd;

            let opts = AnalyzeOptions {
                input,
                format: format.map(FileFormat::from),
                symbol,
                start: parse_date(start.as_deref())?,
                end: parse_date(end.as_deref())?,
                export,
            };
            run_analyze(&opts, indicator_config)
        }
        Commands::Indicators => {
            print_indicators();
            Ok(())
        }
    }
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stockta=info"));

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

struct AnalyzeOptions {
    input: PathBuf,
    format: Option<FileFormat>,
    symbol: Option<String>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    export: Option<PathBuf>,
}

fn run_analyze(opts: &AnalyzeOptions, config: IndicatorConfig) -> Result<()> {
    let engine = IndicatorEngine::new(config).context("invalid indicator configuration")?;

    let format = opts
        .format
        .unwrap_or_else(|| FileFormat::from_path(&opts.input));
    let fetched = load_file(&opts.input, format, opts.symbol.as_deref())
        .with_context(|| format!("load {}", opts.input.display()))?;
    let series = fetched.into_series()?;

    let series = if opts.start.is_some() || opts.end.is_some() {
        series.slice_dates(opts.start, opts.end)?
    } else {
        series
    };
    if series.is_empty() {
        tracing::warn!(symbol = series.symbol(), "no bars in the selected range");
    }

    let started = Instant::now();
    let series = engine.enriched(series)?;
    tracing::debug!(
        symbol = series.symbol(),
        columns = engine.output_names().len(),
        elapsed_us = started.elapsed().as_micros() as u64,
        "enriched series"
    );

    let hash = series_hash(&series);
    summary::print_summary(&series, &engine, &hash);

    if let Some(path) = &opts.export {
        export::export_csv(&series, &engine.output_names(), path)?;
        println!("Exported to: {}", path.display());
    }

    Ok(())
}

fn parse_date(raw: Option<&str>) -> Result<Option<NaiveDate>> {
    raw.map(|s| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("invalid date '{s}', expected YYYY-MM-DD"))
    })
    .transpose()
}

fn print_indicators() {
    println!("{:<14} {:<10} {:<10}", "Name", "Period", "Enabled");
    println!("{}", "-".repeat(36));
    for (name, period, flag) in indicator_rows(&Periods::default()) {
        println!("{name:<14} {period:<10} {flag:<10}");
    }
}

/// Name, period and enabling flag of every series `analyze` can produce,
/// in computation order.
fn indicator_rows(p: &Periods) -> Vec<(String, String, &'static str)> {
    let macd = format!("{}/{}/{}", p.macd_fast, p.macd_slow, p.macd_signal);
    let mut rows = vec![
        (format!("SMA_{}", p.sma_fast), p.sma_fast.to_string(), "always"),
        (format!("SMA_{}", p.sma_slow), p.sma_slow.to_string(), "always"),
        (format!("EMA_{}", p.ema), p.ema.to_string(), "--ema"),
        ("RSI".to_string(), p.rsi.to_string(), "--rsi"),
    ];
    for name in ["MACD", "MACD_Signal", "MACD_Hist"] {
        rows.push((name.to_string(), macd.clone(), "--macd"));
    }
    rows
}
