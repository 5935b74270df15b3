//! Descriptive statistics over a news table.
//!
//! - Headline length distribution
//! - Article counts per publisher
//! - Publication counts per day
//! - Most frequent headline words

use crate::domain::types::NewsRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Statistics};
use std::collections::{BTreeMap, HashMap};

const UNKNOWN_PUBLISHER: &str = "unknown";

/// Count / mean / std / min / quartiles / max of headline lengths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LengthSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` with fewer than two headlines
    pub std: Option<f64>,
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub word: String,
    pub count: usize,
}

/// Everything the descriptive pass produces for one news table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsStatistics {
    pub articles: usize,
    pub headline_lengths: Option<LengthSummary>,
    pub publishers: Vec<(String, usize)>,
    pub publication_trend: BTreeMap<NaiveDate, usize>,
    pub keywords: Vec<KeywordCount>,
}

pub fn summarize(news: &[NewsRecord], top_keywords: usize) -> NewsStatistics {
    NewsStatistics {
        articles: news.len(),
        headline_lengths: headline_length_summary(news),
        publishers: articles_per_publisher(news),
        publication_trend: publication_trend(news),
        keywords: extract_keywords(news, top_keywords),
    }
}

/// Character length of each headline; a missing headline counts as 0.
pub fn headline_lengths(news: &[NewsRecord]) -> Vec<usize> {
    news.iter()
        .map(|n| n.headline.as_deref().map_or(0, |h| h.chars().count()))
        .collect()
}

/// `None` for an empty table.
pub fn headline_length_summary(news: &[NewsRecord]) -> Option<LengthSummary> {
    if news.is_empty() {
        return None;
    }
    let lengths: Vec<f64> = headline_lengths(news)
        .into_iter()
        .map(|l| l as f64)
        .collect();
    let count = lengths.len();

    let mean = lengths.iter().mean();
    let std = (count > 1).then(|| lengths.iter().std_dev());

    let mut sorted = lengths;
    sorted.sort_by(f64::total_cmp);
    let data = Data::new(sorted);
    Some(LengthSummary {
        count,
        mean,
        std,
        min: data[0],
        p25: linear_quantile(&data, 0.25),
        median: linear_quantile(&data, 0.5),
        p75: linear_quantile(&data, 0.75),
        max: data[count - 1],
    })
}

/// Quantile by linear interpolation between closest ranks, `h = (n - 1) * p`.
/// `data` must be sorted ascending and non-empty.
fn linear_quantile(data: &Data<Vec<f64>>, p: f64) -> f64 {
    let h = (data.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    data[lo] + (h - lo as f64) * (data[hi] - data[lo])
}

/// Article counts per publisher, most prolific first (ties by name).
pub fn articles_per_publisher(news: &[NewsRecord]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for n in news {
        let publisher = n
            .publisher
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(UNKNOWN_PUBLISHER);
        *counts.entry(publisher).or_insert(0) += 1;
    }

    let mut out: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(p, c)| (p.to_string(), c))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

/// Number of articles per calendar date.
pub fn publication_trend(news: &[NewsRecord]) -> BTreeMap<NaiveDate, usize> {
    let mut trend = BTreeMap::new();
    for n in news {
        *trend.entry(n.date).or_insert(0) += 1;
    }
    trend
}

/// Top `n` lowercase word tokens (Unicode letters, digits and `_`) across all
/// headlines. Ties keep the order in which the words were first seen.
pub fn extract_keywords(news: &[NewsRecord], n: usize) -> Vec<KeywordCount> {
    // word -> (count, first seen)
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    let mut order = 0;

    for headline in news.iter().filter_map(|r| r.headline.as_deref()) {
        let lower = headline.to_lowercase();
        for word in lower
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|w| !w.is_empty())
        {
            let entry = counts.entry(word.to_string()).or_insert_with(|| {
                order += 1;
                (0, order)
            });
            entry.0 += 1;
        }
    }

    let mut ranked: Vec<(String, (usize, usize))> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.0.cmp(&a.1.0).then(a.1.1.cmp(&b.1.1)));
    ranked
        .into_iter()
        .take(n)
        .map(|(word, (count, _))| KeywordCount { word, count })
        .collect()
}
