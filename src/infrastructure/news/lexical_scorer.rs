use crate::domain::sentiment::{SentimentPolicy, SentimentScorer};

/// Keyword heuristic: +1 when the headline contains "positive", -1 when it
/// contains "negative", otherwise 0. Matching is case-insensitive and
/// "positive" wins when both appear.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalScorer;

impl LexicalScorer {
    pub fn new() -> Self {
        Self
    }
}

impl SentimentScorer for LexicalScorer {
    fn score(&self, text: &str) -> f64 {
        let lower = text.to_lowercase();
        if lower.contains("positive") {
            1.0
        } else if lower.contains("negative") {
            -1.0
        } else {
            0.0
        }
    }

    fn policy(&self) -> SentimentPolicy {
        SentimentPolicy::Lexical
    }
}
