//! Polarity-model sentiment scoring using VADER
//!
//! This module scores headlines with the VADER (Valence Aware Dictionary and
//! sEntiment Reasoner) compound score, a continuous polarity in [-1, 1].
//!
//! # Example
//! ```rust,ignore
//! use sentitrade::infrastructure::news::sentiment_analyzer::PolarityScorer;
//!
//! let scorer = PolarityScorer::new();
//! let score = scorer.score("Shares rally after strong earnings beat");
//! assert!(score > 0.0);
//! ```

use crate::domain::sentiment::{SentimentPolicy, SentimentScorer};
use vader_sentiment::SentimentIntensityAnalyzer;

/// A thread-safe polarity scorer backed by the VADER lexicon.
pub struct PolarityScorer {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl PolarityScorer {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }
}

impl Default for PolarityScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer for PolarityScorer {
    /// Compound score clamped to [-1, 1].
    fn score(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }

        let scores = self.analyzer.polarity_scores(text);
        let compound = scores.get("compound").copied().unwrap_or(0.0);
        if compound.is_finite() {
            compound.clamp(-1.0, 1.0)
        } else {
            0.0
        }
    }

    fn policy(&self) -> SentimentPolicy {
        SentimentPolicy::Polarity
    }
}
