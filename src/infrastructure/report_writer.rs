use crate::application::news_statistics::NewsStatistics;
use crate::application::pipeline::AnalysisReport;
use crate::domain::types::{AlignedRecord, PriceRecord};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Files written for one analysis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenReport {
    pub indicators_csv: PathBuf,
    pub aligned_csv: PathBuf,
    pub report_json: PathBuf,
}

pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(output_dir: &Path) -> Result<Self> {
        fs::create_dir_all(output_dir).context(format!(
            "Failed to create output directory {}",
            output_dir.display()
        ))?;
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Writes `<stem>_indicators.csv`, `<stem>_aligned.csv` and `<stem>_report.json`.
    pub fn write(&self, stem: &str, report: &AnalysisReport) -> Result<WrittenReport> {
        let stem = sanitize_stem(stem);
        let written = WrittenReport {
            indicators_csv: self.output_dir.join(format!("{}_indicators.csv", stem)),
            aligned_csv: self.output_dir.join(format!("{}_aligned.csv", stem)),
            report_json: self.output_dir.join(format!("{}_report.json", stem)),
        };

        write_csv::<PriceRecord>(&written.indicators_csv, &report.indicators)?;
        write_csv::<AlignedRecord>(&written.aligned_csv, &report.aligned)?;
        write_json(&written.report_json, report)?;

        info!(
            output_dir = %self.output_dir.display(),
            stem = %stem,
            "Report written"
        );
        Ok(written)
    }

    pub fn write_news_statistics(&self, stem: &str, stats: &NewsStatistics) -> Result<PathBuf> {
        let path = self
            .output_dir
            .join(format!("{}_news_stats.json", sanitize_stem(stem)));
        write_json(&path, stats)?;
        Ok(path)
    }
}

fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .context(format!("Failed to create {}", path.display()))?;
    for row in rows {
        wtr.serialize(row)
            .context(format!("Failed to write row to {}", path.display()))?;
    }
    wtr.flush()
        .context(format!("Failed to flush {}", path.display()))?;
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize report")?;
    fs::write(path, json).context(format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Keeps file names portable: anything outside `[A-Za-z0-9_-]` becomes `_`.
fn sanitize_stem(stem: &str) -> String {
    let cleaned: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "analysis".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_stem() {
        assert_eq!(sanitize_stem("AAPL"), "AAPL");
        assert_eq!(sanitize_stem("BRK.B"), "BRK_B");
        assert_eq!(sanitize_stem("../etc"), "___etc");
        assert_eq!(sanitize_stem(""), "analysis");
    }
}
