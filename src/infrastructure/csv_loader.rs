//! CSV tables for prices and news.
//!
//! Headers are matched case-insensitively. A missing required column is fatal;
//! cell contents are returned unparsed so the aligner decides what is malformed.

use crate::domain::errors::DatasetError;
use crate::domain::types::{RawNewsRow, RawPriceRow};
use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Index of the first header matching `column` or one of its `aliases`.
fn column_index(
    headers: &StringRecord,
    table: &'static str,
    column: &'static str,
    aliases: &[&str],
) -> Result<usize, DatasetError> {
    find_column(headers, column, aliases).ok_or(DatasetError::MissingColumn { table, column })
}

fn find_column(headers: &StringRecord, column: &str, aliases: &[&str]) -> Option<usize> {
    headers.iter().position(|h| {
        let h = h.trim().trim_start_matches('\u{feff}');
        h.eq_ignore_ascii_case(column) || aliases.iter().any(|a| h.eq_ignore_ascii_case(a))
    })
}

fn cell(record: &StringRecord, idx: usize) -> Option<String> {
    record
        .get(idx)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn reader<R: Read>(source: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(source)
}

fn line_of(record: &StringRecord, fallback: u64) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(fallback)
}

/// Reads a price table with at least `date` and `close` columns.
pub fn read_price_table<R: Read>(source: R) -> Result<Vec<RawPriceRow>> {
    let mut rdr = reader(source);
    let headers = rdr.headers().context("Failed to read price header")?.clone();
    let date_idx = column_index(&headers, "price", "date", &[])?;
    let close_idx = column_index(&headers, "price", "close", &[])?;

    let mut rows = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(row = i + 1, error = %e, "Skipping unreadable price row");
                continue;
            }
        };
        rows.push(RawPriceRow {
            line: line_of(&record, i as u64 + 2),
            date: cell(&record, date_idx).unwrap_or_default(),
            close: cell(&record, close_idx).unwrap_or_default(),
        });
    }
    Ok(rows)
}

/// Reads a news table with at least `date`, `headline` and `ticker` (or
/// `stock`) columns; `publisher` is optional.
pub fn read_news_table<R: Read>(source: R) -> Result<Vec<RawNewsRow>> {
    let mut rdr = reader(source);
    let headers = rdr.headers().context("Failed to read news header")?.clone();
    let date_idx = column_index(&headers, "news", "date", &[])?;
    let headline_idx = column_index(&headers, "news", "headline", &[])?;
    let ticker_idx = column_index(&headers, "news", "ticker", &["stock"])?;
    let publisher_idx = find_column(&headers, "publisher", &[]);

    let mut rows = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(row = i + 1, error = %e, "Skipping unreadable news row");
                continue;
            }
        };
        rows.push(RawNewsRow {
            line: line_of(&record, i as u64 + 2),
            date: cell(&record, date_idx).unwrap_or_default(),
            headline: cell(&record, headline_idx),
            ticker: cell(&record, ticker_idx),
            publisher: publisher_idx.and_then(|idx| cell(&record, idx)),
        });
    }
    Ok(rows)
}

pub fn load_price_table(path: &Path) -> Result<Vec<RawPriceRow>> {
    let file = File::open(path).context(format!("Failed to open {}", path.display()))?;
    let rows =
        read_price_table(file).context(format!("Failed to load price table {}", path.display()))?;
    info!(path = %path.display(), rows = rows.len(), "Price dataset loaded");
    Ok(rows)
}

pub fn load_news_table(path: &Path) -> Result<Vec<RawNewsRow>> {
    let file = File::open(path).context(format!("Failed to open {}", path.display()))?;
    let rows =
        read_news_table(file).context(format!("Failed to load news table {}", path.display()))?;
    info!(path = %path.display(), rows = rows.len(), "News dataset loaded");
    Ok(rows)
}

/// Every `.csv` file directly inside `dir`, sorted by file name.
pub fn discover_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        std::fs::read_dir(dir).context(format!("Failed to read directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .context(format!("Failed to list directory {}", dir.display()))?
            .path();
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if path.is_file() && is_csv {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_price_table() {
        let data = "Date,Open,High,Low,Close,Volume\n\
                    2024-01-02,1,1,1,100.5,10\n\
                    2024-01-03,1,1,1,,10\n";
        let rows = read_price_table(data.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, "2024-01-02");
        assert_eq!(rows[0].close, "100.5");
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[1].close, "");
    }

    #[test]
    fn test_missing_close_column_is_fatal() {
        let data = "Date,Open\n2024-01-02,1\n";
        let err = read_price_table(data.as_bytes()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DatasetError>(),
            Some(DatasetError::MissingColumn {
                table: "price",
                column: "close"
            })
        ));
    }

    #[test]
    fn test_read_news_table_with_stock_alias() {
        let data = ",headline,url,publisher,date,stock\n\
                    0,Stocks That Hit 52-Week Highs,http://x,Benzinga Insights,2020-06-05 10:30:54-04:00,A\n\
                    1,\"Quote, with comma\",http://y,,2020-06-04 10:45:20-04:00,A\n";
        let rows = read_news_table(data.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].ticker.as_deref(), Some("A"));
        assert_eq!(rows[0].publisher.as_deref(), Some("Benzinga Insights"));
        assert_eq!(rows[1].headline.as_deref(), Some("Quote, with comma"));
        assert_eq!(rows[1].publisher, None);
        assert_eq!(rows[1].date, "2020-06-04 10:45:20-04:00");
    }

    #[test]
    fn test_missing_headline_column_is_fatal() {
        let data = "date,title,ticker\n2024-01-02,x,AAPL\n";
        let err = read_news_table(data.as_bytes()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DatasetError>(),
            Some(DatasetError::MissingColumn {
                table: "news",
                column: "headline"
            })
        ));
    }

    #[test]
    fn test_short_rows_yield_empty_cells() {
        let data = "date,headline,ticker\n2024-01-02\n";
        let rows = read_news_table(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].headline, None);
        assert_eq!(rows[0].ticker, None);
    }
}
