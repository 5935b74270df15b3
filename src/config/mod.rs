//! Configuration module for Sentitrade.
//!
//! This module provides structured configuration loading from environment variables
//! (or a TOML file), organized by domain: Indicators, Sentiment and Reports.

mod indicator_config;
mod report_config;
mod sentiment_config;

pub use indicator_config::IndicatorEnvConfig;
pub use report_config::ReportEnvConfig;
pub use sentiment_config::SentimentEnvConfig;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Key lookup used by the `from_source` constructors. `from_env` passes the
/// process environment; tests pass a map.
pub type VarSource<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Main application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub indicators: IndicatorEnvConfig,
    pub sentiment: SentimentEnvConfig,
    pub report: ReportEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_source(&|key| env::var(key).ok())
    }

    pub fn from_source(vars: VarSource<'_>) -> Result<Self> {
        let indicators =
            IndicatorEnvConfig::from_source(vars).context("Failed to load indicator config")?;
        let sentiment =
            SentimentEnvConfig::from_source(vars).context("Failed to load sentiment config")?;
        let report = ReportEnvConfig::from_source(vars).context("Failed to load report config")?;

        let config = Self {
            indicators,
            sentiment,
            report,
        };
        config.validate()?;
        Ok(config)
    }

    /// Loads a TOML config file. Missing sections and keys keep their defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .context(format!("Failed to parse config TOML: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.indicators
            .validate()
            .context("Invalid indicator config")?;
        self.report.validate().context("Invalid report config")?;
        Ok(())
    }
}

fn parse_usize(vars: VarSource<'_>, key: &str, default: usize) -> Result<usize> {
    vars(key)
        .unwrap_or_else(|| default.to_string())
        .trim()
        .parse::<usize>()
        .context(format!("Failed to parse {}", key))
}

fn parse_f64(vars: VarSource<'_>, key: &str, default: f64) -> Result<f64> {
    vars(key)
        .unwrap_or_else(|| default.to_string())
        .trim()
        .parse::<f64>()
        .context(format!("Failed to parse {}", key))
}
