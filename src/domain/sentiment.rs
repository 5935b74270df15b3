use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which scorer a run uses. Exactly one policy applies to every headline of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentPolicy {
    /// +1 / -1 / 0 from the words "positive" / "negative"
    #[default]
    Lexical,
    /// Continuous polarity in [-1, 1] from a lexicon model
    Polarity,
}

impl FromStr for SentimentPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lexical" => Ok(SentimentPolicy::Lexical),
            "polarity" | "vader" => Ok(SentimentPolicy::Polarity),
            _ => anyhow::bail!(
                "Invalid SENTIMENT_POLICY: {}. Must be 'lexical' or 'polarity'",
                s
            ),
        }
    }
}

impl fmt::Display for SentimentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lexical => write!(f, "lexical"),
            Self::Polarity => write!(f, "polarity"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SentimentLabel {
    Negative,
    Neutral,
    Positive,
}

impl SentimentLabel {
    pub fn from_score(score: f64) -> Self {
        if score > 0.05 {
            Self::Positive
        } else if score < -0.05 {
            Self::Negative
        } else {
            Self::Neutral
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Negative => write!(f, "Negative"),
            Self::Neutral => write!(f, "Neutral"),
            Self::Positive => write!(f, "Positive"),
        }
    }
}

/// Maps a headline to a real-valued sentiment score.
pub trait SentimentScorer: Send + Sync {
    /// Score a headline. Empty text scores 0.0.
    fn score(&self, text: &str) -> f64;

    fn policy(&self) -> SentimentPolicy;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            SentimentPolicy::from_str("Lexical").unwrap(),
            SentimentPolicy::Lexical
        );
        assert_eq!(
            SentimentPolicy::from_str("vader").unwrap(),
            SentimentPolicy::Polarity
        );
        assert!(SentimentPolicy::from_str("textblob").is_err());
    }

    #[test]
    fn test_label_from_score() {
        assert_eq!(SentimentLabel::from_score(1.0), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_score(0.0), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(0.05), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(-0.4), SentimentLabel::Negative);
    }
}
