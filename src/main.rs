//! Sentitrade - news sentiment vs. stock return analysis
//!
//! Loads a price CSV and a news CSV, computes technical indicators, scores
//! headlines, aligns both by date and reports the sentiment/return correlation.
//!
//! # Usage
//! ```sh
//! sentitrade analyze --prices data/AAPL.csv --news data/raw_analyst_ratings.csv --ticker AAPL
//! sentitrade batch --data-dir data/yfinance --news data/raw_analyst_ratings.csv
//! sentitrade news-stats --news data/raw_analyst_ratings.csv --top 20
//! ```
//!
//! # Environment Variables
//! - `SENTIMENT_POLICY` - `lexical` (default) or `polarity`
//! - `OUTPUT_DIR` - Where reports are written (default: reports)
//! - `RUST_LOG` - Log filter (default: info)

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sentitrade::application::news_statistics::summarize;
use sentitrade::application::alignment::normalize_news;
use sentitrade::application::pipeline::{AnalysisReport, SentimentReturnPipeline};
use sentitrade::config::Config;
use sentitrade::domain::sentiment::SentimentPolicy;
use sentitrade::domain::types::RawNewsRow;
use sentitrade::infrastructure::csv_loader::{
    discover_csv_files, load_news_table, load_price_table,
};
use sentitrade::infrastructure::report_writer::ReportWriter;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{Level, error, info, warn};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct CommonArgs {
    /// TOML config file (overrides environment variables)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sentiment policy: lexical or polarity
    #[arg(long)]
    policy: Option<String>,

    /// Output directory for reports
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one price table against a news table
    Analyze {
        /// Price CSV (date, close)
        #[arg(long)]
        prices: PathBuf,

        /// News CSV (date, headline, ticker)
        #[arg(long)]
        news: PathBuf,

        /// Only use news for this ticker
        #[arg(short, long)]
        ticker: Option<String>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Analyze every price CSV in a directory; the file stem is the ticker
    Batch {
        /// Directory of price CSVs
        #[arg(long)]
        data_dir: PathBuf,

        /// News CSV (date, headline, ticker)
        #[arg(long)]
        news: PathBuf,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Descriptive statistics of a news table
    NewsStats {
        /// News CSV (date, headline, ticker)
        #[arg(long)]
        news: PathBuf,

        /// Number of keywords to report
        #[arg(long)]
        top: Option<usize>,

        #[command(flatten)]
        common: CommonArgs,
    },
}

fn load_config(common: &CommonArgs) -> Result<Config> {
    let mut config = match &common.config {
        Some(path) => Config::from_toml_file(path)?,
        None => Config::from_env()?,
    };
    if let Some(policy) = &common.policy {
        config.sentiment.policy = SentimentPolicy::from_str(policy)?;
    }
    if let Some(output) = &common.output {
        config.report.output_dir = output.clone();
    }
    Ok(config)
}

fn print_summary(report: &AnalysisReport) {
    let s = &report.summary;
    println!("\n══════════════════════════════════════════════════════");
    println!(
        "  SENTIMENT vs RETURN  [{}]",
        s.ticker.as_deref().unwrap_or("all news")
    );
    println!("══════════════════════════════════════════════════════");
    println!("  Policy:          {}", s.policy);
    println!(
        "  Price rows:      {} read, {} dropped",
        s.price_rows_read, s.price_rows_dropped
    );
    println!(
        "  News rows:       {} read, {} dropped, {} in scope",
        s.news_rows_read, s.news_rows_dropped, s.news_in_scope
    );
    println!(
        "  Trading days:    {} ({} with news)",
        s.trading_days, s.days_with_news
    );
    println!("  Correlation:     {}", s.correlation);
}

fn analyze(
    pipeline: &SentimentReturnPipeline,
    writer: &ReportWriter,
    prices_path: &Path,
    news: &[RawNewsRow],
    ticker: Option<&str>,
) -> Result<AnalysisReport> {
    let prices = load_price_table(prices_path)?;
    let report = pipeline.run(ticker, &prices, news)?;

    let stem = ticker
        .map(str::to_string)
        .or_else(|| {
            prices_path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "analysis".to_string());
    let written = writer.write(&stem, &report)?;
    info!(report = %written.report_json.display(), "Outputs saved");
    Ok(report)
}

/// Analyzes every price file in `data_dir` independently. Fails only when
/// every analyzed ticker failed; returns the number of successful tickers.
fn run_batch(
    pipeline: &SentimentReturnPipeline,
    writer: &ReportWriter,
    data_dir: &Path,
    news_path: &Path,
    news: &[RawNewsRow],
) -> Result<usize> {
    let news_canonical = news_path.canonicalize().ok();
    let files = discover_csv_files(data_dir)?;
    info!(files = files.len(), dir = %data_dir.display(), "Batch analysis starting");

    let mut analyzed = 0;
    let mut failures = 0;
    for path in files {
        if path.canonicalize().ok() == news_canonical {
            continue;
        }
        let Some(ticker) = path.file_stem().and_then(|s| s.to_str()) else {
            warn!(path = %path.display(), "Skipping file with non UTF-8 name");
            continue;
        };
        analyzed += 1;
        match analyze(pipeline, writer, &path, news, Some(ticker)) {
            Ok(report) => print_summary(&report),
            Err(e) => {
                failures += 1;
                error!(ticker, error = %format!("{:#}", e), "Skipping ticker");
            }
        }
    }

    if analyzed > 0 && failures == analyzed {
        anyhow::bail!("All {} tickers in {} failed", analyzed, data_dir.display());
    }
    if failures > 0 {
        warn!(failures, analyzed, "Batch finished with failed tickers");
    }
    Ok(analyzed - failures)
}

fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            prices,
            news,
            ticker,
            common,
        } => {
            let config = load_config(&common)?;
            let writer = ReportWriter::new(&config.report.output_dir)?;
            let pipeline = SentimentReturnPipeline::new(config);

            let news_rows = load_news_table(&news)?;
            let report = analyze(&pipeline, &writer, &prices, &news_rows, ticker.as_deref())?;
            print_summary(&report);
        }
        Commands::Batch {
            data_dir,
            news,
            common,
        } => {
            let config = load_config(&common)?;
            let writer = ReportWriter::new(&config.report.output_dir)?;
            let pipeline = SentimentReturnPipeline::new(config);

            let news_rows = load_news_table(&news)?;
            run_batch(&pipeline, &writer, &data_dir, &news, &news_rows)?;
        }
        Commands::NewsStats { news, top, common } => {
            let config = load_config(&common)?;
            let top = top.unwrap_or(config.report.top_keywords);

            let rows = load_news_table(&news)?;
            let table = normalize_news(&rows);
            let stats = summarize(&table.records, top);

            let writer = ReportWriter::new(&config.report.output_dir)?;
            let stem = news
                .file_stem()
                .and_then(|s| s.to_str())
                .context("News file has no usable name")?;
            let path = writer.write_news_statistics(stem, &stats)?;

            println!("\n  Articles: {} ({} rows dropped)", stats.articles, table.dropped);
            if let Some(lengths) = &stats.headline_lengths {
                println!(
                    "  Headline length: mean {:.1}, median {:.1}, min {}, max {}",
                    lengths.mean, lengths.median, lengths.min, lengths.max
                );
            }
            println!("  Top publishers:");
            for (publisher, count) in stats.publishers.iter().take(10) {
                println!("    {:<30} {:>7}", publisher, count);
            }
            println!("  Top keywords:");
            for kw in &stats.keywords {
                println!("    {:<30} {:>7}", kw.word, kw.count);
            }
            println!("\n  Saved to {}", path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn setup(dir: &Path) -> (SentimentReturnPipeline, ReportWriter, PathBuf) {
        let news = dir.join("news.csv");
        fs::write(&news, "date,headline,ticker\n2024-01-03,positive,GOOD\n").unwrap();
        let writer = ReportWriter::new(&dir.join("out")).unwrap();
        (SentimentReturnPipeline::new(Config::default()), writer, news)
    }

    #[test]
    fn test_batch_fails_when_every_ticker_fails() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("prices");
        fs::create_dir(&data).unwrap();
        fs::write(data.join("BAD.csv"), "date,close\nnope,abc\n").unwrap();
        fs::write(data.join("WORSE.csv"), "date,open\n2024-01-02,1\n").unwrap();

        let (pipeline, writer, news) = setup(dir.path());
        let rows = load_news_table(&news).unwrap();
        assert!(run_batch(&pipeline, &writer, &data, &news, &rows).is_err());
    }

    #[test]
    fn test_batch_tolerates_partial_failure() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("prices");
        fs::create_dir(&data).unwrap();
        fs::write(data.join("BAD.csv"), "date,close\nnope,abc\n").unwrap();
        fs::write(
            data.join("GOOD.csv"),
            "date,close\n2024-01-02,100\n2024-01-03,101\n",
        )
        .unwrap();

        let (pipeline, writer, news) = setup(dir.path());
        let rows = load_news_table(&news).unwrap();
        let succeeded = run_batch(&pipeline, &writer, &data, &news, &rows).unwrap();
        assert_eq!(succeeded, 1);
        assert!(dir.path().join("out").join("GOOD_report.json").exists());
    }
}
