use crate::domain::correlation::CorrelationResult;
use crate::domain::types::AlignedRecord;
use statrs::statistics::Statistics;
use tracing::{info, warn};

/// Pearson correlation over paired observations.
///
/// Pairs where either side is `None` (or non-finite) are dropped first.
pub fn pearson(pairs: &[(Option<f64>, Option<f64>)]) -> CorrelationResult {
    let (xs, ys): (Vec<f64>, Vec<f64>) = pairs
        .iter()
        .filter_map(|&(x, y)| match (x, y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some((x, y)),
            _ => None,
        })
        .unzip();
    let n = xs.len();

    if n < 2 {
        return CorrelationResult::InsufficientData { pairs: n };
    }

    // Sample statistics (n - 1); the normalization cancels in the ratio
    let var_x = xs.iter().variance();
    let var_y = ys.iter().variance();
    if is_constant(&xs, var_x) || is_constant(&ys, var_y) {
        return CorrelationResult::ZeroVariance { pairs: n };
    }

    let cov = xs.iter().covariance(ys.iter());
    let r = cov / (var_x.sqrt() * var_y.sqrt());
    CorrelationResult::Coefficient {
        value: r.clamp(-1.0, 1.0),
        pairs: n,
    }
}

/// Variance negligible relative to the mean square of the values.
fn is_constant(values: &[f64], variance: f64) -> bool {
    let scale = values.iter().map(|v| v * v).mean();
    variance <= f64::EPSILON * scale
}

/// Correlates aligned sentiment against daily returns.
pub fn sentiment_return_correlation(aligned: &[AlignedRecord]) -> CorrelationResult {
    let pairs: Vec<(Option<f64>, Option<f64>)> = aligned
        .iter()
        .map(|a| (a.sentiment, a.daily_return))
        .collect();

    let result = pearson(&pairs);
    match result {
        CorrelationResult::Coefficient { value, pairs } => {
            info!(correlation = value, pairs, "Sentiment/return correlation computed");
        }
        CorrelationResult::InsufficientData { pairs } => {
            warn!(pairs, "Correlation undefined: fewer than 2 complete pairs");
        }
        CorrelationResult::ZeroVariance { pairs } => {
            warn!(pairs, "Correlation undefined: zero variance");
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some_pairs(xs: &[f64], ys: &[f64]) -> Vec<(Option<f64>, Option<f64>)> {
        xs.iter().zip(ys).map(|(&x, &y)| (Some(x), Some(y))).collect()
    }

    #[test]
    fn test_perfect_linear_relation() {
        let xs = [-1.0, 0.0, 0.5, 1.0, -0.3];
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 * x).collect();

        let result = pearson(&some_pairs(&xs, &ys));
        let r = result.value().unwrap();
        assert!((r - 1.0).abs() < 1e-9, "r = {}", r);
        assert_eq!(result.pairs(), 5);
    }

    #[test]
    fn test_perfect_inverse_relation() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [8.0, 6.0, 4.0, 2.0];
        let r = pearson(&some_pairs(&xs, &ys)).value().unwrap();
        assert!((r + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_known_value() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = [2.0, 4.0, 5.0, 4.0, 5.0];
        // r = 6 / sqrt(10 * 6)
        let expected = 6.0 / 60.0_f64.sqrt();
        let r = pearson(&some_pairs(&xs, &ys)).value().unwrap();
        assert!((r - expected).abs() < 1e-9);
    }

    #[test]
    fn test_constant_sentiment_is_zero_variance() {
        let xs = [1.0, 1.0, 1.0, 1.0];
        let ys = [2.0, -0.98, 3.96, 1.9];
        assert_eq!(
            pearson(&some_pairs(&xs, &ys)),
            CorrelationResult::ZeroVariance { pairs: 4 }
        );
    }

    #[test]
    fn test_incomplete_pairs_dropped() {
        let pairs = vec![
            (Some(1.0), None),
            (None, Some(2.0)),
            (Some(0.5), Some(1.0)),
            (Some(f64::NAN), Some(1.0)),
        ];
        assert_eq!(
            pearson(&pairs),
            CorrelationResult::InsufficientData { pairs: 1 }
        );
        assert_eq!(
            pearson(&[]),
            CorrelationResult::InsufficientData { pairs: 0 }
        );
    }

    #[test]
    fn test_small_scale_series_is_not_constant() {
        let result = pearson(&some_pairs(&[1e-9, 2e-9, 3e-9], &[1.0, 2.0, 3.0]));
        assert_eq!(result.pairs(), 3);
        assert!((result.value().unwrap() - 1.0).abs() < 1e-9);

        let flat = pearson(&some_pairs(&[0.0, 0.0, 0.0], &[1.0, 2.0, 3.0]));
        assert_eq!(flat, CorrelationResult::ZeroVariance { pairs: 3 });
    }
}
