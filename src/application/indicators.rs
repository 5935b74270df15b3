//! Technical indicators over a daily close series.
//!
//! Every function returns a series of the same length as its input, aligned by
//! position. Points whose lookback window is not yet full are `None`.
//!
//! Non-finite or non-positive closes split the series into independent runs:
//! any window that would include such a value is `None`, and the recursive
//! indicators (RSI, MACD) restart their warm-up after it.

use crate::config::IndicatorEnvConfig;
use crate::domain::errors::IndicatorError;
use crate::domain::types::{PriceRecord, is_valid_close};
use std::ops::Range;
use ta::Next;
use ta::indicators::SimpleMovingAverage;
use tracing::debug;

/// Output of [`macd`]: one entry per input close.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

/// Maximal ranges of consecutive usable closes.
fn valid_runs(closes: &[f64]) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut start = None;

    for (i, &close) in closes.iter().enumerate() {
        match (is_valid_close(close), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push(s..i);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push(s..closes.len());
    }
    runs
}

fn check_period(name: &'static str, value: usize) -> Result<(), IndicatorError> {
    if value == 0 {
        return Err(IndicatorError::InvalidPeriod { name, value });
    }
    Ok(())
}

/// Simple moving average of the trailing `window` closes.
pub fn sma(closes: &[f64], window: usize) -> Result<Vec<Option<f64>>, IndicatorError> {
    check_period("SMA", window)?;
    let mut out = vec![None; closes.len()];

    for run in valid_runs(closes) {
        // Fresh state per run so a window never spans an invalid close
        let mut indicator =
            SimpleMovingAverage::new(window).map_err(|e| IndicatorError::Backend {
                name: "SMA",
                reason: format!("{:?}", e),
            })?;

        for (offset, i) in run.enumerate() {
            let value = indicator.next(closes[i]);
            if offset + 1 >= window {
                out[i] = Some(value);
            }
        }
    }
    Ok(out)
}

/// Wilder's relative strength index.
///
/// The first `window` points of each run are `None` (the first delta needs a
/// prior close). Flat windows score 50.
pub fn rsi(closes: &[f64], window: usize) -> Result<Vec<Option<f64>>, IndicatorError> {
    check_period("RSI", window)?;
    let mut out = vec![None; closes.len()];
    let n = window as f64;

    for run in valid_runs(closes) {
        if run.len() <= window {
            continue;
        }
        let slice = &closes[run.clone()];

        let mut gain_sum = 0.0;
        let mut loss_sum = 0.0;
        for w in slice[..=window].windows(2) {
            let delta = w[1] - w[0];
            if delta > 0.0 {
                gain_sum += delta;
            } else {
                loss_sum -= delta;
            }
        }
        let mut avg_gain = gain_sum / n;
        let mut avg_loss = loss_sum / n;
        out[run.start + window] = Some(rsi_from_averages(avg_gain, avg_loss));

        for i in (window + 1)..slice.len() {
            let delta = slice[i] - slice[i - 1];
            let (gain, loss) = if delta > 0.0 {
                (delta, 0.0)
            } else {
                (0.0, -delta)
            };
            avg_gain = (avg_gain * (n - 1.0) + gain) / n;
            avg_loss = (avg_loss * (n - 1.0) + loss) / n;
            out[run.start + i] = Some(rsi_from_averages(avg_gain, avg_loss));
        }
    }
    Ok(out)
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss <= 0.0 {
        return if avg_gain <= 0.0 { 50.0 } else { 100.0 };
    }
    let rs = avg_gain / avg_loss;
    (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
}

/// Exponential moving average seeded with the SMA of the first `period` values.
///
/// Operates on a fully valid slice; the first `period - 1` outputs are `None`.
fn seeded_ema(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if values.len() < period {
        return out;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = values[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = Some(ema);
    for i in period..values.len() {
        ema = (values[i] - ema) * k + ema;
        out[i] = Some(ema);
    }
    out
}

/// MACD line (fast EMA − slow EMA), its signal EMA and the histogram.
///
/// The MACD line starts once the slow EMA is seeded; signal and histogram start
/// `signal - 1` points later.
pub fn macd(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal: usize,
) -> Result<MacdSeries, IndicatorError> {
    check_period("MACD fast", fast)?;
    check_period("MACD slow", slow)?;
    check_period("MACD signal", signal)?;
    if fast >= slow {
        return Err(IndicatorError::InvalidMacdPeriods { fast, slow });
    }

    let len = closes.len();
    let mut series = MacdSeries {
        macd: vec![None; len],
        signal: vec![None; len],
        histogram: vec![None; len],
    };

    for run in valid_runs(closes) {
        let slice = &closes[run.clone()];
        if slice.len() < slow {
            continue;
        }

        let fast_ema = seeded_ema(slice, fast);
        let slow_ema = seeded_ema(slice, slow);

        // slow >= fast, so both EMAs are defined from slow - 1 onwards
        let line: Vec<f64> = (slow - 1..slice.len())
            .filter_map(|i| Some(fast_ema[i]? - slow_ema[i]?))
            .collect();
        let signal_line = seeded_ema(&line, signal);

        for (j, value) in line.iter().enumerate() {
            let idx = run.start + slow - 1 + j;
            series.macd[idx] = Some(*value);
            if let Some(sig) = signal_line[j] {
                series.signal[idx] = Some(sig);
                series.histogram[idx] = Some(value - sig);
            }
        }
    }
    Ok(series)
}

/// Percent change from the previous close; `None` for the first point and
/// whenever either close is unusable.
pub fn daily_returns(closes: &[f64]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(closes.len());
    out.push(None);
    for w in closes.windows(2) {
        let (prev, curr) = (w[0], w[1]);
        if is_valid_close(prev) && is_valid_close(curr) {
            out.push(Some((curr - prev) / prev * 100.0));
        } else {
            out.push(None);
        }
    }
    out.truncate(closes.len());
    out
}

/// Computes every configured indicator over an ascending price series.
pub struct IndicatorCalculator {
    config: IndicatorEnvConfig,
}

impl IndicatorCalculator {
    pub fn new(config: IndicatorEnvConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IndicatorEnvConfig {
        &self.config
    }

    /// Returns new records carrying the derived series; the input is untouched.
    pub fn enrich(&self, prices: &[PriceRecord]) -> Result<Vec<PriceRecord>, IndicatorError> {
        let cfg = &self.config;
        let closes: Vec<f64> = prices.iter().map(|p| p.close).collect();

        let sma_fast = sma(&closes, cfg.sma_fast_period)?;
        let sma_medium = sma(&closes, cfg.sma_medium_period)?;
        let sma_slow = sma(&closes, cfg.sma_slow_period)?;
        let rsi_values = rsi(&closes, cfg.rsi_period)?;
        let macd_values = macd(
            &closes,
            cfg.macd_fast_period,
            cfg.macd_slow_period,
            cfg.macd_signal_period,
        )?;
        let returns = daily_returns(&closes);

        debug!(
            rows = prices.len(),
            defined_rsi = rsi_values.iter().flatten().count(),
            defined_macd = macd_values.macd.iter().flatten().count(),
            "Indicators computed"
        );

        Ok(prices
            .iter()
            .enumerate()
            .map(|(i, p)| PriceRecord {
                date: p.date,
                close: p.close,
                sma_fast: sma_fast[i],
                sma_medium: sma_medium[i],
                sma_slow: sma_slow[i],
                rsi: rsi_values[i],
                macd: macd_values.macd[i],
                macd_signal: macd_values.signal[i],
                macd_hist: macd_values.histogram[i],
                daily_return: returns[i],
            })
            .collect())
    }
}
