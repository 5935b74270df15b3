//! Chart-ready series for an external plotting surface.
//!
//! Nothing here renders; every struct is a fully computed, serializable series.

use crate::config::IndicatorEnvConfig;
use crate::domain::types::{AlignedRecord, PriceRecord, ScoredNews};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceChart {
    pub dates: Vec<NaiveDate>,
    pub close: Vec<f64>,
    pub sma_fast: Vec<Option<f64>>,
    pub sma_medium: Vec<Option<f64>>,
    pub sma_slow: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdChart {
    pub dates: Vec<NaiveDate>,
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsiChart {
    pub dates: Vec<NaiveDate>,
    pub rsi: Vec<Option<f64>>,
    pub overbought: f64,
    pub oversold: f64,
    pub overbought_count: usize,
    pub oversold_count: usize,
    pub histogram: Vec<HistogramBin>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub date: NaiveDate,
    pub sentiment: f64,
    pub daily_return: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub price: PriceChart,
    pub macd: MacdChart,
    pub rsi: RsiChart,
    pub sentiment_distribution: Vec<HistogramBin>,
    pub sentiment_vs_return: Vec<ScatterPoint>,
    pub publication_trend: Vec<(NaiveDate, usize)>,
}

/// Equal-width histogram over the observed range of finite values.
///
/// A constant input yields a single bin; an empty input yields no bins.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = finite.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = finite.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if max - min <= f64::EPSILON {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: finite.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for v in finite {
        // max falls into the last (closed) bin
        let idx = (((v - min) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

pub fn price_chart(prices: &[PriceRecord]) -> PriceChart {
    PriceChart {
        dates: prices.iter().map(|p| p.date).collect(),
        close: prices.iter().map(|p| p.close).collect(),
        sma_fast: prices.iter().map(|p| p.sma_fast).collect(),
        sma_medium: prices.iter().map(|p| p.sma_medium).collect(),
        sma_slow: prices.iter().map(|p| p.sma_slow).collect(),
    }
}

pub fn macd_chart(prices: &[PriceRecord]) -> MacdChart {
    MacdChart {
        dates: prices.iter().map(|p| p.date).collect(),
        macd: prices.iter().map(|p| p.macd).collect(),
        signal: prices.iter().map(|p| p.macd_signal).collect(),
        histogram: prices.iter().map(|p| p.macd_hist).collect(),
    }
}

pub fn rsi_chart(prices: &[PriceRecord], config: &IndicatorEnvConfig, bins: usize) -> RsiChart {
    let defined: Vec<f64> = prices.iter().filter_map(|p| p.rsi).collect();
    RsiChart {
        dates: prices.iter().map(|p| p.date).collect(),
        rsi: prices.iter().map(|p| p.rsi).collect(),
        overbought: config.rsi_overbought,
        oversold: config.rsi_oversold,
        overbought_count: defined
            .iter()
            .filter(|&&v| v > config.rsi_overbought)
            .count(),
        oversold_count: defined
            .iter()
            .filter(|&&v| v < config.rsi_oversold)
            .count(),
        histogram: histogram(&defined, bins),
    }
}

/// Points where both sentiment and return are defined.
pub fn sentiment_scatter(aligned: &[AlignedRecord]) -> Vec<ScatterPoint> {
    aligned
        .iter()
        .filter_map(|a| {
            Some(ScatterPoint {
                date: a.date,
                sentiment: a.sentiment?,
                daily_return: a.daily_return?,
            })
        })
        .collect()
}

pub fn build_chart_data(
    prices: &[PriceRecord],
    aligned: &[AlignedRecord],
    news: &[ScoredNews],
    trend: &BTreeMap<NaiveDate, usize>,
    config: &IndicatorEnvConfig,
    bins: usize,
) -> ChartData {
    let sentiments: Vec<f64> = news.iter().map(|n| n.sentiment).collect();
    ChartData {
        price: price_chart(prices),
        macd: macd_chart(prices),
        rsi: rsi_chart(prices, config, bins),
        sentiment_distribution: histogram(&sentiments, bins),
        sentiment_vs_return: sentiment_scatter(aligned),
        publication_trend: trend.iter().map(|(d, c)| (*d, *c)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn test_histogram_counts_every_value() {
        let values = [-1.0, -0.5, 0.0, 0.0, 0.5, 1.0, f64::NAN];
        let bins = histogram(&values, 4);

        assert_eq!(bins.len(), 4);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 6);
        assert_eq!(bins[0].lower, -1.0);
        assert_eq!(bins[3].upper, 1.0);
        // max lands in the last bin
        assert_eq!(bins[3].count, 2);
    }

    #[test]
    fn test_histogram_degenerate_inputs() {
        assert!(histogram(&[], 10).is_empty());
        let single = histogram(&[1.0, 1.0, 1.0], 10);
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].count, 3);
    }

    #[test]
    fn test_rsi_band_counts() {
        let mut prices: Vec<PriceRecord> = (1..=4).map(|i| PriceRecord::new(d(i), 10.0)).collect();
        prices[1].rsi = Some(80.0);
        prices[2].rsi = Some(20.0);
        prices[3].rsi = Some(50.0);

        let chart = rsi_chart(&prices, &IndicatorEnvConfig::default(), 5);
        assert_eq!(chart.overbought_count, 1);
        assert_eq!(chart.oversold_count, 1);
        assert_eq!(chart.rsi[0], None);
        assert_eq!(chart.overbought, 70.0);
    }

    #[test]
    fn test_scatter_skips_incomplete_rows() {
        let aligned = vec![
            AlignedRecord {
                date: d(2),
                close: 100.0,
                daily_return: None,
                sentiment: Some(1.0),
                headline_count: 1,
            },
            AlignedRecord {
                date: d(3),
                close: 101.0,
                daily_return: Some(1.0),
                sentiment: Some(-1.0),
                headline_count: 1,
            },
            AlignedRecord {
                date: d(4),
                close: 102.0,
                daily_return: Some(0.99),
                sentiment: None,
                headline_count: 0,
            },
        ];
        let points = sentiment_scatter(&aligned);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].date, d(3));
    }
}
