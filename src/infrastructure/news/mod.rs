pub mod lexical_scorer;
pub mod sentiment_analyzer;

use crate::domain::sentiment::{SentimentPolicy, SentimentScorer};
use lexical_scorer::LexicalScorer;
use sentiment_analyzer::PolarityScorer;

/// Builds the scorer for a policy. One scorer is used for a whole run.
pub fn scorer_for(policy: SentimentPolicy) -> Box<dyn SentimentScorer> {
    match policy {
        SentimentPolicy::Lexical => Box::new(LexicalScorer::new()),
        SentimentPolicy::Polarity => Box::new(PolarityScorer::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_matches_policy() {
        assert_eq!(
            scorer_for(SentimentPolicy::Lexical).policy(),
            SentimentPolicy::Lexical
        );
        assert_eq!(
            scorer_for(SentimentPolicy::Polarity).policy(),
            SentimentPolicy::Polarity
        );
    }
}
