//! Temporal alignment of news sentiment with daily prices.
//!
//! Both sources are keyed by calendar date. Malformed rows are dropped while
//! normalizing, then prices are left-joined with the per-day mean sentiment.

use crate::application::indicators::daily_returns;
use crate::domain::errors::DatasetError;
use crate::domain::types::{
    AlignedRecord, NewsRecord, PriceRecord, RawNewsRow, RawPriceRow, ScoredNews,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info, warn};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Records that survived normalization and how many rows were excluded.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized<T> {
    pub records: Vec<T>,
    pub dropped: usize,
}

/// Parses a `YYYY-MM-DD` date, or the calendar date of a timestamp that starts
/// with one (`YYYY-MM-DD HH:MM:SS[±HH:MM]`, RFC 3339). The date is taken as
/// written; no timezone conversion is applied.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.len() == 10 {
        return NaiveDate::parse_from_str(s, DATE_FORMAT).ok();
    }
    if s.len() < 10 || !s.is_char_boundary(10) {
        return None;
    }
    match s.as_bytes()[10] {
        b' ' | b'T' => {}
        _ => return None,
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// Parses price rows, dropping unparseable dates, non-numeric closes and
/// repeated dates (first occurrence wins). Output is sorted by date.
pub fn normalize_prices(rows: &[RawPriceRow]) -> Normalized<PriceRecord> {
    let mut records = Vec::with_capacity(rows.len());
    let mut seen = HashSet::with_capacity(rows.len());
    let mut dropped = 0;

    for row in rows {
        let Some(date) = parse_calendar_date(&row.date) else {
            warn!(line = row.line, date = %row.date, "Dropping price row: malformed date");
            dropped += 1;
            continue;
        };
        let close = match row.close.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => {
                warn!(line = row.line, close = %row.close, "Dropping price row: non-numeric close");
                dropped += 1;
                continue;
            }
        };
        if !seen.insert(date) {
            warn!(line = row.line, %date, "Dropping price row: duplicate date");
            dropped += 1;
            continue;
        }
        records.push(PriceRecord::new(date, close));
    }

    records.sort_by_key(|p| p.date);
    debug!(kept = records.len(), dropped, "Price rows normalized");
    Normalized { records, dropped }
}

/// Parses news rows, dropping rows whose date cannot be parsed.
pub fn normalize_news(rows: &[RawNewsRow]) -> Normalized<NewsRecord> {
    let mut records = Vec::with_capacity(rows.len());
    let mut dropped = 0;

    for row in rows {
        let Some(date) = parse_calendar_date(&row.date) else {
            warn!(line = row.line, date = %row.date, "Dropping news row: malformed date");
            dropped += 1;
            continue;
        };
        records.push(NewsRecord {
            date,
            headline: row.headline.clone(),
            ticker: row.ticker.clone().unwrap_or_default(),
            publisher: row.publisher.clone(),
        });
    }

    debug!(kept = records.len(), dropped, "News rows normalized");
    Normalized { records, dropped }
}

/// Keeps only news for `ticker` (case-insensitive).
pub fn filter_by_ticker(news: &[ScoredNews], ticker: &str) -> Vec<ScoredNews> {
    news.iter()
        .filter(|n| n.record.ticker.trim().eq_ignore_ascii_case(ticker.trim()))
        .cloned()
        .collect()
}

/// Mean sentiment and headline count per date.
pub fn daily_sentiment(news: &[ScoredNews]) -> BTreeMap<NaiveDate, (f64, usize)> {
    let mut sums: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for n in news {
        let entry = sums.entry(n.record.date).or_insert((0.0, 0));
        entry.0 += n.sentiment;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(date, (sum, count))| (date, (sum / count as f64, count)))
        .collect()
}

/// Left-joins prices with same-day news sentiment.
///
/// Every price record yields exactly one aligned record. Days without news get
/// `sentiment: None`. Several headlines on one day collapse to their mean.
pub fn align(
    prices: &[PriceRecord],
    news: &[ScoredNews],
) -> Result<Vec<AlignedRecord>, DatasetError> {
    if prices.is_empty() {
        return Err(DatasetError::EmptyInput { table: "price" });
    }

    let prices: Cow<'_, [PriceRecord]> = if prices.windows(2).all(|w| w[0].date <= w[1].date) {
        Cow::Borrowed(prices)
    } else {
        warn!("Price records not in date order; sorting before alignment");
        let mut sorted = prices.to_vec();
        sorted.sort_by_key(|p| p.date);
        Cow::Owned(sorted)
    };

    let by_date = daily_sentiment(news);
    let closes: Vec<f64> = prices.iter().map(|p| p.close).collect();
    let returns = daily_returns(&closes);

    let aligned: Vec<AlignedRecord> = prices
        .iter()
        .zip(returns)
        .map(|(price, daily_return)| {
            let (sentiment, headline_count) = match by_date.get(&price.date) {
                Some(&(mean, count)) => (Some(mean), count),
                None => (None, 0),
            };
            AlignedRecord {
                date: price.date,
                close: price.close,
                daily_return,
                sentiment,
                headline_count,
            }
        })
        .collect();

    let with_news = aligned.iter().filter(|a| a.sentiment.is_some()).count();
    info!(
        price_days = aligned.len(),
        days_with_news = with_news,
        news_days = by_date.len(),
        "Merge complete"
    );
    Ok(aligned)
}
