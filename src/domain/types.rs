use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A price row exactly as read from the CSV, before date/number parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPriceRow {
    /// 1-based line in the source file (header is line 1)
    pub line: u64,
    pub date: String,
    pub close: String,
}

/// A news row exactly as read from the CSV, before date parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawNewsRow {
    pub line: u64,
    pub date: String,
    pub headline: Option<String>,
    pub ticker: Option<String>,
    pub publisher: Option<String>,
}

/// One trading day for a single instrument.
///
/// Derived fields stay `None` until enough preceding history exists; they are
/// never zero-filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub date: NaiveDate,
    pub close: f64,
    pub sma_fast: Option<f64>,
    pub sma_medium: Option<f64>,
    pub sma_slow: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_hist: Option<f64>,
    pub daily_return: Option<f64>,
}

impl PriceRecord {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            close,
            sma_fast: None,
            sma_medium: None,
            sma_slow: None,
            rsi: None,
            macd: None,
            macd_signal: None,
            macd_hist: None,
            daily_return: None,
        }
    }

    /// A close is usable when it is finite and strictly positive.
    pub fn has_valid_close(&self) -> bool {
        is_valid_close(self.close)
    }
}

pub fn is_valid_close(close: f64) -> bool {
    close.is_finite() && close > 0.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsRecord {
    pub date: NaiveDate,
    /// `None` when the cell was empty
    pub headline: Option<String>,
    pub ticker: String,
    pub publisher: Option<String>,
}

/// A news record with the score assigned by the active sentiment policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredNews {
    pub record: NewsRecord,
    pub sentiment: f64,
}

/// Price day joined with the collapsed sentiment of that day's headlines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedRecord {
    pub date: NaiveDate,
    pub close: f64,
    /// Percent change from the previous close
    pub daily_return: Option<f64>,
    /// `None` means no news on that date, which is distinct from neutral news (0.0)
    pub sentiment: Option<f64>,
    pub headline_count: usize,
}
