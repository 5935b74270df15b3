use crate::application::alignment::{align, filter_by_ticker, normalize_news, normalize_prices};
use crate::application::charts::{ChartData, build_chart_data};
use crate::application::correlation::sentiment_return_correlation;
use crate::application::indicators::IndicatorCalculator;
use crate::application::news_statistics::{NewsStatistics, summarize};
use crate::application::sentiment_scoring::{label_counts, score_headlines};
use crate::config::Config;
use crate::domain::correlation::CorrelationResult;
use crate::domain::errors::DatasetError;
use crate::domain::sentiment::{SentimentLabel, SentimentPolicy, SentimentScorer};
use crate::domain::types::{AlignedRecord, NewsRecord, PriceRecord, RawNewsRow, RawPriceRow};
use crate::infrastructure::news::scorer_for;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{error, info, warn};

/// Row accounting and the headline result of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub ticker: Option<String>,
    pub policy: SentimentPolicy,
    pub generated_at: DateTime<Utc>,
    pub price_rows_read: usize,
    pub price_rows_dropped: usize,
    pub news_rows_read: usize,
    pub news_rows_dropped: usize,
    /// News records left after ticker scoping
    pub news_in_scope: usize,
    pub trading_days: usize,
    pub days_with_news: usize,
    pub sentiment_labels: BTreeMap<SentimentLabel, usize>,
    pub correlation: CorrelationResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub summary: RunSummary,
    pub news_statistics: NewsStatistics,
    pub charts: ChartData,
    #[serde(skip)]
    pub indicators: Vec<PriceRecord>,
    #[serde(skip)]
    pub aligned: Vec<AlignedRecord>,
}

/// Runs normalization, indicators, scoring, alignment and correlation for one
/// instrument.
pub struct SentimentReturnPipeline {
    config: Config,
    scorer: Box<dyn SentimentScorer>,
}

impl SentimentReturnPipeline {
    /// Uses the scorer selected by `config.sentiment.policy`.
    pub fn new(config: Config) -> Self {
        let scorer = scorer_for(config.sentiment.policy);
        Self { config, scorer }
    }

    pub fn with_scorer(config: Config, scorer: Box<dyn SentimentScorer>) -> Self {
        Self { config, scorer }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Analyzes one price table against a news table.
    ///
    /// With `ticker` set, only news for that ticker is considered. Failures are
    /// logged here and returned; no partial report is produced.
    pub fn run(
        &self,
        ticker: Option<&str>,
        prices: &[RawPriceRow],
        news: &[RawNewsRow],
    ) -> Result<AnalysisReport> {
        self.run_stages(ticker, prices, news).inspect_err(|e| {
            error!(ticker = ticker.unwrap_or("-"), error = %format!("{:#}", e), "Analysis failed");
        })
    }

    fn run_stages(
        &self,
        ticker: Option<&str>,
        prices: &[RawPriceRow],
        news: &[RawNewsRow],
    ) -> Result<AnalysisReport> {
        info!(
            ticker = ticker.unwrap_or("-"),
            policy = %self.scorer.policy(),
            price_rows = prices.len(),
            news_rows = news.len(),
            "Starting analysis"
        );

        let price_table = normalize_prices(prices);
        if price_table.records.is_empty() {
            return Err(DatasetError::EmptyInput { table: "price" }.into());
        }
        let news_table = normalize_news(news);
        if news_table.records.is_empty() {
            warn!("News table has no usable rows; sentiment will be undefined for every day");
        }

        let calculator = IndicatorCalculator::new(self.config.indicators.clone());
        let indicators = calculator
            .enrich(&price_table.records)
            .context("Failed to compute technical indicators")?;

        let scored = score_headlines(&news_table.records, self.scorer.as_ref());
        let scoped = match ticker {
            Some(t) => filter_by_ticker(&scored, t),
            None => scored,
        };
        if let Some(t) = ticker {
            info!(ticker = t, in_scope = scoped.len(), "News scoped to ticker");
        }

        let aligned =
            align(&indicators, &scoped).context("Failed to align news with price data")?;
        let correlation = sentiment_return_correlation(&aligned);

        let scoped_records: Vec<NewsRecord> = scoped.iter().map(|s| s.record.clone()).collect();
        let news_statistics = summarize(&scoped_records, self.config.report.top_keywords);
        let charts = build_chart_data(
            &indicators,
            &aligned,
            &scoped,
            &news_statistics.publication_trend,
            &self.config.indicators,
            self.config.report.histogram_bins,
        );

        let summary = RunSummary {
            ticker: ticker.map(str::to_string),
            policy: self.scorer.policy(),
            generated_at: Utc::now(),
            price_rows_read: prices.len(),
            price_rows_dropped: price_table.dropped,
            news_rows_read: news.len(),
            news_rows_dropped: news_table.dropped,
            news_in_scope: scoped.len(),
            trading_days: aligned.len(),
            days_with_news: aligned.iter().filter(|a| a.sentiment.is_some()).count(),
            sentiment_labels: label_counts(&scoped),
            correlation,
        };

        info!(
            ticker = ticker.unwrap_or("-"),
            trading_days = summary.trading_days,
            days_with_news = summary.days_with_news,
            correlation = %summary.correlation,
            "Analysis complete"
        );

        Ok(AnalysisReport {
            summary,
            news_statistics,
            charts,
            indicators,
            aligned,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price_rows(rows: &[(&str, &str)]) -> Vec<RawPriceRow> {
        rows.iter()
            .enumerate()
            .map(|(i, (date, close))| RawPriceRow {
                line: i as u64 + 2,
                date: date.to_string(),
                close: close.to_string(),
            })
            .collect()
    }

    fn news_row(date: &str, headline: &str, ticker: &str) -> RawNewsRow {
        RawNewsRow {
            line: 2,
            date: date.to_string(),
            headline: Some(headline.to_string()),
            ticker: Some(ticker.to_string()),
            publisher: None,
        }
    }

    #[test]
    fn test_empty_price_table_aborts() {
        let pipeline = SentimentReturnPipeline::new(Config::default());
        let err = pipeline
            .run(None, &price_rows(&[("bad", "1.0")]), &[])
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DatasetError>(),
            Some(DatasetError::EmptyInput { table: "price" })
        ));
    }

    #[test]
    fn test_ticker_scope_and_accounting() {
        let prices = price_rows(&[
            ("2024-01-02", "100"),
            ("2024-01-03", "101"),
            ("garbage", "5"),
            ("2024-01-04", "99"),
        ]);
        let news = vec![
            news_row("2024-01-03", "positive", "AAPL"),
            news_row("2024-01-04", "negative", "AAPL"),
            news_row("2024-01-04", "positive", "MSFT"),
            news_row("??", "positive", "AAPL"),
        ];

        let pipeline = SentimentReturnPipeline::new(Config::default());
        let report = pipeline.run(Some("AAPL"), &prices, &news).unwrap();
        let s = &report.summary;

        assert_eq!(s.price_rows_read, 4);
        assert_eq!(s.price_rows_dropped, 1);
        assert_eq!(s.news_rows_dropped, 1);
        assert_eq!(s.news_in_scope, 2);
        assert_eq!(s.trading_days, 3);
        assert_eq!(s.days_with_news, 2);
        assert_eq!(report.aligned[2].sentiment, Some(-1.0));
        // two points move together: sentiment and return both fall
        assert_eq!(s.correlation.pairs(), 2);
        assert!((s.correlation.value().unwrap() - 1.0).abs() < 1e-9);
    }
}
