use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of correlating aligned sentiment against daily returns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CorrelationResult {
    /// Pearson coefficient in [-1, 1]
    Coefficient { value: f64, pairs: usize },
    /// Fewer than two complete (sentiment, return) pairs
    InsufficientData { pairs: usize },
    /// One of the series is constant
    ZeroVariance { pairs: usize },
}

impl CorrelationResult {
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Coefficient { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn pairs(&self) -> usize {
        match self {
            Self::Coefficient { pairs, .. }
            | Self::InsufficientData { pairs }
            | Self::ZeroVariance { pairs } => *pairs,
        }
    }
}

impl fmt::Display for CorrelationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coefficient { value, pairs } => write!(f, "{:.4} (n={})", value, pairs),
            Self::InsufficientData { pairs } => write!(f, "insufficient data (n={})", pairs),
            Self::ZeroVariance { pairs } => write!(f, "undefined (zero variance, n={})", pairs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let r = CorrelationResult::ZeroVariance { pairs: 4 };
        assert_eq!(r.to_string(), "undefined (zero variance, n=4)");
        assert_eq!(r.value(), None);

        let r = CorrelationResult::Coefficient {
            value: 0.5,
            pairs: 10,
        };
        assert_eq!(r.value(), Some(0.5));
        assert_eq!(r.pairs(), 10);
    }
}
