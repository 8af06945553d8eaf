//! Indicator selection and period configuration.
//!
//! SMA fast/slow are always computed. EMA, RSI and MACD are opt-in flags.
//! Config files are TOML; omitted keys fall back to the classic periods
//! (20/50 SMA, 20 EMA, 14 RSI, 12/26/9 MACD).
//!
//! ```toml
//! include_ema = true
//! include_rsi = true
//!
//! [periods]
//! rsi = 10
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndicatorConfig {
    pub include_ema: bool,
    pub include_rsi: bool,
    pub include_macd: bool,
    pub periods: Periods,
}

/// Window lengths for every indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Periods {
    pub sma_fast: usize,
    pub sma_slow: usize,
    pub ema: usize,
    pub rsi: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
}

impl Default for Periods {
    fn default() -> Self {
        Self {
            sma_fast: 20,
            sma_slow: 50,
            ema: 20,
            rsi: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
        }
    }
}

impl IndicatorConfig {
    /// Every optional indicator switched on, default periods.
    pub fn all() -> Self {
        Self {
            include_ema: true,
            include_rsi: true,
            include_macd: true,
            periods: Periods::default(),
        }
    }

    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("read {}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| Error::Config(format!("parse TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject zero periods.
    ///
    /// Only periods of indicators that will actually run are checked, so a
    /// disabled MACD with a zero signal period does not block SMA/EMA/RSI.
    pub fn validate(&self) -> Result<()> {
        let p = &self.periods;
        let mut checks = vec![("periods.sma_fast", p.sma_fast), ("periods.sma_slow", p.sma_slow)];
        if self.include_ema {
            checks.push(("periods.ema", p.ema));
        }
        if self.include_rsi {
            checks.push(("periods.rsi", p.rsi));
        }
        if self.include_macd {
            checks.push(("periods.macd_fast", p.macd_fast));
            checks.push(("periods.macd_slow", p.macd_slow));
            checks.push(("periods.macd_signal", p.macd_signal));
        }

        match checks.into_iter().find(|(_, value)| *value == 0) {
            Some((name, _)) => Err(Error::zero_period(name)),
            None => Ok(()),
        }
    }
}
