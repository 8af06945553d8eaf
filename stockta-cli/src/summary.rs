//! Plain-text summary of an enriched series.

use stockta_core::domain::CLOSE;
use stockta_core::fingerprint::SeriesHash;
use stockta_core::indicators::{MACD, MACD_HIST, MACD_SIGNAL, RSI};
use stockta_core::{IndicatorConfig, IndicatorEngine, TimeSeries};

const OVERBOUGHT: f64 = 70.0;
const OVERSOLD: f64 = 30.0;

pub fn print_summary(series: &TimeSeries, engine: &IndicatorEngine, hash: &SeriesHash) {
    println!();
    println!("=== Indicator Summary ===");
    println!("Symbol:         {}", series.symbol());
    match (series.first_date(), series.last_date()) {
        (Some(first), Some(last)) => println!("Period:         {first} to {last}"),
        _ => println!("Period:         (no bars)"),
    }
    println!(
        "Bars:           {} ({} warmup)",
        series.len(),
        engine.warmup()
    );
    println!("Fingerprint:    {}", hash.short());
    println!();
    println!("{}", included_lines(engine.config()));

    let last = series.len().checked_sub(1);
    println!();
    println!("--- Latest ---");
    let columns = std::iter::once(CLOSE.to_string()).chain(engine.output_names());
    for name in columns {
        let value = last.and_then(|i| series.value(&name, i));
        println!("{:<15} {:>12}", format!("{name}:"), format_value(value));
    }

    let readings = readings(series);
    if !readings.is_empty() {
        println!();
        println!("--- Readings ---");
        for line in readings {
            println!("{line}");
        }
    }
    println!();
}

/// One sentence naming the lines that were computed.
pub fn included_lines(config: &IndicatorConfig) -> String {
    let p = &config.periods;
    let mut lines = vec![
        "closing price".to_string(),
        format!("{}-day SMA", p.sma_fast),
        format!("{}-day SMA", p.sma_slow),
    ];
    if config.include_ema {
        lines.push(format!("{}-day EMA", p.ema));
    }
    if config.include_rsi {
        lines.push(format!("{}-day RSI", p.rsi));
    }
    if config.include_macd {
        lines.push(format!(
            "MACD ({}/{}/{}) with signal and histogram",
            p.macd_fast, p.macd_slow, p.macd_signal
        ));
    }

    let (tail, head) = lines.split_last().map_or(("", &[][..]), |(t, h)| (t.as_str(), h));
    format!("Lines: {} and {tail}.", head.join(", "))
}

pub fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.4}"),
        None => "-".to_string(),
    }
}

/// Interpretation of the latest RSI and MACD values, when present.
pub fn readings(series: &TimeSeries) -> Vec<String> {
    let mut out = Vec::new();
    let Some(last) = series.len().checked_sub(1) else {
        return out;
    };

    if series.series(RSI).is_some() {
        out.push(match series.value(RSI, last) {
            Some(v) => format!("RSI {v:.1}: {}", rsi_reading(v)),
            None => "RSI: not enough price movement to measure".to_string(),
        });
    }

    if let (Some(m), Some(s)) = (series.value(MACD, last), series.value(MACD_SIGNAL, last)) {
        let prev_hist = last.checked_sub(1).and_then(|i| series.value(MACD_HIST, i));
        out.push(format!("MACD {m:.4} vs signal {s:.4}: {}", macd_reading(m, s, prev_hist)));
    }

    out
}

pub fn rsi_reading(value: f64) -> &'static str {
    if value > OVERBOUGHT {
        "overbought"
    } else if value < OVERSOLD {
        "oversold"
    } else {
        "neutral"
    }
}

/// Position of MACD against its signal line, flagging a cross on the last bar.
pub fn macd_reading(macd: f64, signal: f64, prev_hist: Option<f64>) -> &'static str {
    let hist = macd - signal;
    match prev_hist {
        Some(prev) if prev <= 0.0 && hist > 0.0 => "bullish crossover",
        Some(prev) if prev >= 0.0 && hist < 0.0 => "bearish crossover",
        _ if hist > 0.0 => "above signal (bullish)",
        _ if hist < 0.0 => "below signal (bearish)",
        _ => "on signal",
    }
}
