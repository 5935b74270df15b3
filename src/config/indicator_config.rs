//! Indicator configuration parsing from environment variables.
//!
//! This module handles loading moving-average, RSI and MACD parameters.

use super::{VarSource, parse_f64, parse_usize};
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// Indicator environment configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorEnvConfig {
    // SMA
    pub sma_fast_period: usize,
    pub sma_medium_period: usize,
    pub sma_slow_period: usize,

    // RSI
    pub rsi_period: usize,
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,

    // MACD
    pub macd_fast_period: usize,
    pub macd_slow_period: usize,
    pub macd_signal_period: usize,
}

impl Default for IndicatorEnvConfig {
    fn default() -> Self {
        Self {
            sma_fast_period: 10,
            sma_medium_period: 20,
            sma_slow_period: 50,
            rsi_period: 14,
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
            macd_fast_period: 12,
            macd_slow_period: 26,
            macd_signal_period: 9,
        }
    }
}

impl IndicatorEnvConfig {
    pub fn from_source(vars: VarSource<'_>) -> Result<Self> {
        let d = Self::default();
        Ok(Self {
            sma_fast_period: parse_usize(vars, "SMA_FAST_PERIOD", d.sma_fast_period)?,
            sma_medium_period: parse_usize(vars, "SMA_MEDIUM_PERIOD", d.sma_medium_period)?,
            sma_slow_period: parse_usize(vars, "SMA_SLOW_PERIOD", d.sma_slow_period)?,
            rsi_period: parse_usize(vars, "RSI_PERIOD", d.rsi_period)?,
            rsi_overbought: parse_f64(vars, "RSI_OVERBOUGHT", d.rsi_overbought)?,
            rsi_oversold: parse_f64(vars, "RSI_OVERSOLD", d.rsi_oversold)?,
            macd_fast_period: parse_usize(vars, "MACD_FAST_PERIOD", d.macd_fast_period)?,
            macd_slow_period: parse_usize(vars, "MACD_SLOW_PERIOD", d.macd_slow_period)?,
            macd_signal_period: parse_usize(vars, "MACD_SIGNAL_PERIOD", d.macd_signal_period)?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        let periods = [
            ("SMA_FAST_PERIOD", self.sma_fast_period),
            ("SMA_MEDIUM_PERIOD", self.sma_medium_period),
            ("SMA_SLOW_PERIOD", self.sma_slow_period),
            ("RSI_PERIOD", self.rsi_period),
            ("MACD_FAST_PERIOD", self.macd_fast_period),
            ("MACD_SLOW_PERIOD", self.macd_slow_period),
            ("MACD_SIGNAL_PERIOD", self.macd_signal_period),
        ];
        for (key, value) in periods {
            if value == 0 {
                bail!("{} must be > 0", key);
            }
        }
        if self.macd_fast_period >= self.macd_slow_period {
            bail!(
                "MACD_FAST_PERIOD ({}) must be shorter than MACD_SLOW_PERIOD ({})",
                self.macd_fast_period,
                self.macd_slow_period
            );
        }
        if !(0.0..=100.0).contains(&self.rsi_oversold)
            || !(0.0..=100.0).contains(&self.rsi_overbought)
            || self.rsi_oversold >= self.rsi_overbought
        {
            bail!(
                "RSI bands must satisfy 0 <= oversold ({}) < overbought ({}) <= 100",
                self.rsi_oversold,
                self.rsi_overbought
            );
        }
        Ok(())
    }
}
