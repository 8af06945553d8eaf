//! Content fingerprints of price series and their derived columns.
//!
//! BLAKE3 over a canonical byte encoding: the symbol, every bar, then every
//! derived series in name order. Floats are hashed by bit pattern, so two
//! fingerprints match only if the data is byte-for-byte identical. Absent
//! values get their own tag and can never collide with a present value.

use crate::domain::{DerivedSeries, TimeSeries};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hex-encoded BLAKE3 digest of a `TimeSeries`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesHash(pub String);

impl SeriesHash {
    /// First 12 hex characters, for display.
    pub fn short(&self) -> &str {
        self.0.get(..12).unwrap_or(&self.0)
    }
}

impl fmt::Display for SeriesHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

const TAG_ABSENT: u8 = 0;
const TAG_PRESENT: u8 = 1;

/// Fingerprint the bars and every attached derived series.
pub fn series_hash(series: &TimeSeries) -> SeriesHash {
    let mut hasher = blake3::Hasher::new();
    write_str(&mut hasher, series.symbol());

    hasher.update(&(series.len() as u64).to_le_bytes());
    for bar in series.bars() {
        write_str(&mut hasher, &bar.date.to_string());
        for v in [bar.open, bar.high, bar.low, bar.close, bar.volume] {
            hasher.update(&v.to_bits().to_le_bytes());
        }
    }

    for derived in series.derived() {
        write_derived(&mut hasher, derived);
    }

    SeriesHash(hasher.finalize().to_hex().to_string())
}

/// Fingerprint of only the bar data, ignoring derived columns.
pub fn dataset_hash(series: &TimeSeries) -> SeriesHash {
    let mut bars_only = series.clone();
    bars_only.clear_derived();
    series_hash(&bars_only)
}

fn write_derived(hasher: &mut blake3::Hasher, derived: &DerivedSeries) {
    write_str(hasher, derived.name());
    hasher.update(&(derived.len() as u64).to_le_bytes());
    for value in derived.values() {
        match value {
            Some(v) => {
                hasher.update(&[TAG_PRESENT]);
                hasher.update(&v.to_bits().to_le_bytes());
            }
            None => {
                hasher.update(&[TAG_ABSENT]);
            }
        }
    }
}

fn write_str(hasher: &mut blake3::Hasher, s: &str) {
    hasher.update(&(s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}
