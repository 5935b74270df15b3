//! Report output configuration parsing from environment variables.

use super::{VarSource, parse_usize};
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportEnvConfig {
    pub output_dir: PathBuf,
    pub histogram_bins: usize,
    pub top_keywords: usize,
}

impl Default for ReportEnvConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("reports"),
            histogram_bins: 30,
            top_keywords: 10,
        }
    }
}

impl ReportEnvConfig {
    pub fn from_source(vars: VarSource<'_>) -> Result<Self> {
        let d = Self::default();
        Ok(Self {
            output_dir: vars("OUTPUT_DIR").map(PathBuf::from).unwrap_or(d.output_dir),
            histogram_bins: parse_usize(vars, "HISTOGRAM_BINS", d.histogram_bins)?,
            top_keywords: parse_usize(vars, "TOP_KEYWORDS", d.top_keywords)?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.histogram_bins == 0 {
            bail!("HISTOGRAM_BINS must be > 0");
        }
        Ok(())
    }
}
